/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `plan`  - Generate a single flow and print it
- `chat`  - Generate a flow, then refine it interactively
- `auth`  - Store a provider API key in the system keyring
*/

use crate::cli::PreferenceArgs;
use crate::config::Config;
use crate::error::{KelpError, Result};
use crate::planner::{PlannerSession, SessionContext};
use crate::providers::{create_provider, Provider};
use std::sync::Arc;

pub mod render;
pub mod special_commands;

/// Shown instead of a reply when a refinement turn fails
pub const REFINEMENT_APOLOGY: &str =
    "I'm having trouble connecting to the Yelp knowledge base right now. Could you try rephrasing?";

/// Shown when generation fails
pub const GENERATION_RETRY_HINT: &str = "Failed to generate flow. Please try again.";

/// Builds the configured provider behind an `Arc`
fn shared_provider(config: &Config) -> Result<Arc<dyn Provider>> {
    let provider = create_provider(&config.provider.provider_type, &config.provider)?;
    Ok(Arc::from(provider))
}

/// One-shot plan command
pub mod plan {
    use super::*;

    /// Generate a flow and print it
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `preferences` - Preferences from the command line; `vibe` is required
    /// * `json` - Print the flow as JSON instead of a timeline
    ///
    /// # Errors
    ///
    /// Returns error if the vibe is missing, the provider cannot be created,
    /// or generation fails
    pub async fn run_plan(config: Config, preferences: PreferenceArgs, json: bool) -> Result<()> {
        let vibe = preferences.vibe.clone().ok_or_else(|| {
            KelpError::InvalidPreferences("--vibe is required for `kelp plan`".to_string())
        })?;
        let prefs = preferences.to_preferences(vibe);

        let provider = shared_provider(&config)?;
        let mut session = PlannerSession::new(provider, &config, SessionContext::guest());

        let flow = match session.start(&prefs).await {
            Ok(flow) => flow,
            Err(e) => {
                if e.is_retryable() {
                    eprintln!("{}", GENERATION_RETRY_HINT);
                }
                return Err(e.into());
            }
        };

        if json {
            println!("{}", serde_json::to_string_pretty(flow)?);
        } else {
            render::print_timeline(flow);
            render::print_summary_table(flow);
        }
        Ok(())
    }
}

/// Interactive chat command
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Generates a flow from the command-line preferences (asking for a vibe
    //! if none was given), then runs a readline loop where every line is
    //! either a special command or a refinement request.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `preferences` - Preferences from the command line
    pub async fn run_chat(config: Config, preferences: PreferenceArgs) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let provider = shared_provider(&config)?;
        let model = provider
            .get_current_model()
            .unwrap_or_else(|_| "unknown".to_string());
        let mut session = PlannerSession::new(provider, &config, SessionContext::guest());
        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&session, &config.provider.provider_type, &model);

        if !start_flow(&mut session, &mut rl, &preferences, preferences.vibe.clone()).await? {
            println!("Goodbye!");
            return Ok(());
        }

        loop {
            let prompt = format!("{} ", "kelp>".cyan().bold());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    let message = match parse_special_command(trimmed) {
                        Ok(SpecialCommand::None) => trimmed.to_string(),
                        Ok(SpecialCommand::Suggestion(n)) => {
                            match session.latest_suggestions().get(n - 1) {
                                Some(action) => {
                                    println!("{} {}", ">".dimmed(), action);
                                    action.clone()
                                }
                                None => {
                                    eprintln!("There is no suggestion {} right now\n", n);
                                    continue;
                                }
                            }
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::ShowFlow) => {
                            match session.flow() {
                                Some(flow) => render::print_timeline(flow),
                                None => eprintln!("{}\n", KelpError::NoActiveFlow),
                            }
                            continue;
                        }
                        Ok(SpecialCommand::ShowFlowJson) => {
                            match session.flow() {
                                Some(flow) => println!("{}", serde_json::to_string_pretty(flow)?),
                                None => eprintln!("{}\n", KelpError::NoActiveFlow),
                            }
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status(&session, &config.provider.provider_type, &model);
                            continue;
                        }
                        Ok(SpecialCommand::ClearChat) => {
                            match session.clear_chat() {
                                Ok(message) => render::print_reply(message),
                                Err(e) => eprintln!("{}\n", e),
                            }
                            continue;
                        }
                        Ok(SpecialCommand::StartOver) => {
                            session.start_over();
                            println!("Starting over. Your chat stays until you /clear it.\n");
                            if !start_flow(&mut session, &mut rl, &preferences, None).await? {
                                break;
                            }
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Err(e) => {
                            eprintln!("{}\n", e);
                            continue;
                        }
                    };

                    match session.send_message(&message).await {
                        Ok(outcome) => {
                            if outcome.flow_updated {
                                if let Some(flow) = session.flow() {
                                    render::print_timeline(flow);
                                }
                            }
                            render::print_reply(&outcome.reply);
                        }
                        Err(e) => {
                            tracing::warn!("Refinement turn failed: {}", e);
                            println!("\n{} {}\n", "Kelp:".green().bold(), REFINEMENT_APOLOGY);
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Generates a flow, asking for a vibe until one succeeds
    ///
    /// Returns `false` if the user leaves before a flow exists.
    async fn start_flow(
        session: &mut PlannerSession,
        rl: &mut DefaultEditor,
        preferences: &PreferenceArgs,
        mut vibe: Option<String>,
    ) -> Result<bool> {
        loop {
            let current = match vibe.take() {
                Some(v) => v,
                None => match rl.readline("What's the vibe tonight? ") {
                    Ok(line) => {
                        let line = line.trim().to_string();
                        if matches!(parse_special_command(&line), Ok(SpecialCommand::Exit)) {
                            return Ok(false);
                        }
                        line
                    }
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
                    Err(e) => return Err(e.into()),
                },
            };

            let prefs = preferences.to_preferences(current);
            println!("{}", "Curating your flow...".dimmed());
            match session.start(&prefs).await {
                Ok(flow) => {
                    render::print_timeline(flow);
                    if let Some(intro) = session.messages().last() {
                        render::print_reply(intro);
                    }
                    return Ok(true);
                }
                Err(KelpError::InvalidPreferences(reason)) => {
                    eprintln!("Please {}\n", reason);
                }
                Err(e) => {
                    tracing::error!("Generation failed: {}", e);
                    eprintln!("{}\n", GENERATION_RETRY_HINT);
                }
            }
        }
    }

    /// Display welcome banner at the start of interactive chat mode
    fn print_welcome_banner(session: &PlannerSession, provider: &str, model: &str) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║              Kelp - Plan your night. Chat to tune it.        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Signed in as {}", session.context().session_id.cyan());
        println!("Provider: {} ({})\n", provider, model);
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    /// Display details about the current session
    fn print_status(session: &PlannerSession, provider: &str, model: &str) {
        println!("\n{}", "Session Status".bold());
        println!("  Session:   {}", session.context().session_id);
        println!("  Provider:  {} ({})", provider, model);
        match session.flow() {
            Some(flow) => println!("  Flow:      {} ({} stops)", flow.title, flow.stops.len()),
            None => println!("  Flow:      none"),
        }
        println!("  Messages:  {}\n", session.messages().len());
    }
}

/// Auth command
///
/// Stores a provider API key in the system keyring so later runs can find it
/// without config or environment variables.
pub mod auth {
    use super::*;
    use crate::providers::gemini;
    use rustyline::DefaultEditor;

    /// Prompt for and store credentials for the given provider
    ///
    /// # Arguments
    ///
    /// * `provider` - Provider name (e.g. "gemini", "ollama")
    ///
    /// # Errors
    ///
    /// Returns error for unknown providers, an empty key, or keyring failure
    pub async fn authenticate(provider: &str) -> Result<()> {
        tracing::info!("Starting authentication for provider: {}", provider);

        match provider {
            "gemini" => {
                let mut rl = DefaultEditor::new()?;
                let key = rl.readline("Gemini API key: ")?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(
                        KelpError::MissingCredentials("no API key entered".to_string()).into(),
                    );
                }
                gemini::store_api_key(key)?;
                println!("Gemini: API key stored in the system keyring.");
                Ok(())
            }
            "ollama" => {
                println!("Ollama: no API key needed; ensure `provider.ollama.host` points at your server.");
                Ok(())
            }
            other => Err(KelpError::Provider(format!("Unsupported provider: {}", other)).into()),
        }
    }

}
