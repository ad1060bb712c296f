//! Configuration management for Kelp
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{KelpError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Provider types Kelp knows how to construct
pub const VALID_PROVIDERS: [&str; 2] = ["gemini", "ollama"];

/// Main configuration structure for Kelp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Gemini, Ollama)
    pub provider: ProviderConfig,
    /// Flow planning behavior
    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Provider configuration
///
/// Specifies which hosted model to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// HTTP timeout for a single model request (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_request_timeout() -> u64 {
    120
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: "gemini".to_string(),
            request_timeout_seconds: default_request_timeout(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use for Gemini
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL (overridable so tests can point at a mock server)
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// API key; when unset the key is read from the environment or keyring
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Reasoning budget used when generating a new flow
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: Option<u32>,
}

fn default_gemini_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_thinking_budget() -> Option<u32> {
    Some(1024)
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: default_gemini_api_base(),
            api_key: None,
            thinking_budget: default_thinking_budget(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Flow planning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Fewest stops a generated flow may have
    #[serde(default = "default_min_stops")]
    pub min_stops: usize,

    /// Most stops a generated flow may have
    #[serde(default = "default_max_stops")]
    pub max_stops: usize,

    /// Cap on follow-up suggestions kept from a refinement reply
    #[serde(default = "default_max_suggested_actions")]
    pub max_suggested_actions: usize,

    /// Title used when the model does not name a generated flow
    #[serde(default = "default_title")]
    pub default_title: String,

    /// Most recent messages sent as history on refinement; `None` sends all
    #[serde(default)]
    pub history_limit: Option<usize>,
}

fn default_min_stops() -> usize {
    2
}

fn default_max_stops() -> usize {
    4
}

fn default_max_suggested_actions() -> usize {
    4
}

fn default_title() -> String {
    "Your Custom Flow".to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_stops: default_min_stops(),
            max_stops: default_max_stops(),
            max_suggested_actions: default_max_suggested_actions(),
            default_title: default_title(),
            history_limit: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| KelpError::Config(format!("Failed to read config file: {}", e)))?;

        serde_yaml::from_str(&contents)
            .map_err(|e| KelpError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("KELP_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("KELP_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("KELP_GEMINI_API_BASE") {
            self.provider.gemini.api_base = api_base;
        }

        if let Ok(api_key) = std::env::var("KELP_GEMINI_API_KEY") {
            if !api_key.trim().is_empty() {
                self.provider.gemini.api_key = Some(api_key);
            }
        }

        if let Ok(host) = std::env::var("KELP_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(model) = std::env::var("KELP_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }

        if let Ok(timeout) = std::env::var("KELP_REQUEST_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(value) => {
                    self.provider.request_timeout_seconds = value;
                    tracing::debug!(
                        request_timeout_seconds = value,
                        "Env override: KELP_REQUEST_TIMEOUT_SECONDS"
                    );
                }
                Err(_) => {
                    tracing::warn!("Invalid KELP_REQUEST_TIMEOUT_SECONDS: {}", timeout);
                }
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(provider) = &cli.provider {
            tracing::debug!("Using provider override: {}", provider);
            self.provider.provider_type = provider.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(KelpError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !VALID_PROVIDERS.contains(&self.provider.provider_type.as_str()) {
            return Err(KelpError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                VALID_PROVIDERS.join(", ")
            ))
            .into());
        }

        if self.provider.request_timeout_seconds == 0 {
            return Err(KelpError::Config(
                "request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.provider.gemini.model.trim().is_empty() || self.provider.ollama.model.trim().is_empty()
        {
            return Err(KelpError::Config("Model names cannot be empty".to_string()).into());
        }

        if self.provider.gemini.api_base.trim().is_empty() || self.provider.ollama.host.trim().is_empty()
        {
            return Err(
                KelpError::Config("Provider hosts cannot be empty".to_string()).into(),
            );
        }

        if self.planner.min_stops == 0 {
            return Err(KelpError::Config(
                "planner.min_stops must be greater than 0".to_string(),
            )
            .into());
        }

        if self.planner.min_stops > self.planner.max_stops {
            return Err(KelpError::Config(format!(
                "planner.min_stops ({}) must not exceed planner.max_stops ({})",
                self.planner.min_stops, self.planner.max_stops
            ))
            .into());
        }

        if !(1..=4).contains(&self.planner.max_suggested_actions) {
            return Err(KelpError::Config(
                "planner.max_suggested_actions must be between 1 and 4".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            planner: PlannerConfig::default(),
        }
    }
}
