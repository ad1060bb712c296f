//! Command-line interface definition for Kelp
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for one-shot planning, interactive chat, and
//! authentication.

use crate::flow::{Budget, TimeOfDay, UserPreferences};
use clap::{Args, Parser, Subcommand};

/// Kelp - conversational night-out planner
///
/// Describe a vibe and get a multi-stop plan, then refine it by chatting.
#[derive(Parser, Debug, Clone)]
#[command(name = "kelp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "KELP_CONFIG", default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the provider from config (gemini, ollama)
    #[arg(short, long, global = true)]
    pub provider: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// What the user wants out of the night
#[derive(Args, Debug, Clone, PartialEq)]
pub struct PreferenceArgs {
    /// The mood and constraints, in your own words
    #[arg(long)]
    pub vibe: Option<String>,

    /// City, neighborhood or zip
    #[arg(short, long, default_value = "")]
    pub location: String,

    /// Per-person budget: econ, standard, premium, splurge (or $ to $$$$)
    #[arg(short, long, default_value = "standard", value_parser = Budget::parse_str)]
    pub budget: Budget,

    /// Time of day: afternoon, evening, late_night
    #[arg(short, long, default_value = "evening", value_parser = TimeOfDay::parse_str)]
    pub time: TimeOfDay,

    /// Number of people (1-20)
    #[arg(short, long, default_value_t = 2)]
    pub group_size: u32,
}

impl PreferenceArgs {
    /// Preferences for the given vibe
    pub fn to_preferences(&self, vibe: impl Into<String>) -> UserPreferences {
        UserPreferences::new(self.location.clone(), vibe)
            .with_budget(self.budget)
            .with_time(self.time)
            .with_group_size(self.group_size)
    }
}

impl Default for PreferenceArgs {
    fn default() -> Self {
        Self {
            vibe: None,
            location: String::new(),
            budget: Budget::default(),
            time: TimeOfDay::default(),
            group_size: 2,
        }
    }
}

/// Available commands for Kelp
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate a plan and print it
    Plan {
        #[command(flatten)]
        preferences: PreferenceArgs,

        /// Print the plan as JSON instead of a timeline
        #[arg(long)]
        json: bool,
    },

    /// Generate a plan, then refine it interactively
    Chat {
        #[command(flatten)]
        preferences: PreferenceArgs,
    },

    /// Store the API key for the selected provider in the system keyring
    Auth,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            provider: None,
            command: Commands::Chat {
                preferences: PreferenceArgs::default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config.as_deref(), Some("config/config.yaml"));
        assert!(!cli.verbose);
        assert!(cli.provider.is_none());
    }

    #[test]
    fn test_cli_parse_plan_with_preferences() {
        let cli = Cli::try_parse_from([
            "kelp",
            "plan",
            "--vibe",
            "first date",
            "--location",
            "Chicago",
            "--budget",
            "$$$",
            "--time",
            "late-night",
            "--group-size",
            "4",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Plan { preferences, json } => {
                assert!(json);
                assert_eq!(preferences.vibe.as_deref(), Some("first date"));
                let prefs = preferences.to_preferences("first date");
                assert_eq!(prefs.location, "Chicago");
                assert_eq!(prefs.budget, Budget::Premium);
                assert_eq!(prefs.time, TimeOfDay::LateNight);
                assert_eq!(prefs.group_size, 4);
            }
            other => panic!("expected plan, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_plan_defaults() {
        let cli = Cli::try_parse_from(["kelp", "plan", "--vibe", "chill"]).unwrap();
        match cli.command {
            Commands::Plan { preferences, json } => {
                assert!(!json);
                assert_eq!(preferences.budget, Budget::Standard);
                assert_eq!(preferences.time, TimeOfDay::Evening);
                assert_eq!(preferences.group_size, 2);
                assert!(preferences.location.is_empty());
            }
            other => panic!("expected plan, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_invalid_budget() {
        let result = Cli::try_parse_from(["kelp", "plan", "--vibe", "x", "--budget", "lavish"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_provider_after_subcommand() {
        let cli = Cli::try_parse_from(["kelp", "chat", "--provider", "ollama"]).unwrap();
        assert_eq!(cli.provider.as_deref(), Some("ollama"));
        assert!(matches!(cli.command, Commands::Chat { .. }));
    }

    #[test]
    fn test_cli_parse_auth() {
        let cli = Cli::try_parse_from(["kelp", "auth", "--provider", "gemini"]).unwrap();
        assert!(matches!(cli.command, Commands::Auth));
        assert_eq!(cli.provider.as_deref(), Some("gemini"));

        let cli = Cli::try_parse_from(["kelp", "auth"]).unwrap();
        assert!(cli.provider.is_none());
    }

    #[test]
    fn test_cli_parse_with_config_and_verbose() {
        let cli =
            Cli::try_parse_from(["kelp", "--config", "custom.yaml", "--verbose", "auth"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
        assert!(cli.verbose);
    }
}
