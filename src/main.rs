//! Kelp - conversational night-out planner
//!
#![doc = "Kelp - conversational night-out planner"]
#![doc = "Main entry point for the Kelp command-line application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kelp::cli::{Cli, Commands};
use kelp::commands;
use kelp::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Plan { preferences, json } => {
            tracing::info!("Generating a flow");
            commands::plan::run_plan(config, preferences, json).await?;
            Ok(())
        }
        Commands::Chat { preferences } => {
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(config, preferences).await?;
            Ok(())
        }
        Commands::Auth => {
            let provider = config.provider.provider_type.clone();
            tracing::info!("Starting authentication for provider: {}", provider);
            commands::auth::authenticate(&provider).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "kelp=debug" } else { "kelp=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
