//! Error types for Kelp
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Kelp operations
///
/// The planner core returns this type directly so callers can tell a failed
/// attempt (`Generation`, `Refinement`) apart from everything else. The
/// application layer wraps it in `anyhow` through the [`Result`] alias.
#[derive(Error, Debug)]
pub enum KelpError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The hosted model invocation itself failed (network, provider status,
    /// missing candidate text)
    #[error("Provider error: {0}")]
    Provider(String),

    /// The model answered with JSON that does not satisfy the minimum flow shape
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// Generating a new flow failed; nothing changed, the user may retry
    #[error("Failed to generate flow: {0}")]
    Generation(String),

    /// A refinement turn failed; nothing changed, the user may retry
    #[error("Failed to refine flow: {0}")]
    Refinement(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// User preferences failed validation before any request was made
    #[error("Invalid preferences: {0}")]
    InvalidPreferences(String),

    /// An operation needed an active flow but the session has none
    #[error("No active flow in this session")]
    NoActiveFlow,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl KelpError {
    /// Whether this error means "nothing happened, try again"
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::error::KelpError;
    ///
    /// assert!(KelpError::Generation("timeout".to_string()).is_retryable());
    /// assert!(!KelpError::Config("bad".to_string()).is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Generation(_) | Self::Refinement(_) | Self::Provider(_) | Self::Http(_)
        )
    }
}

/// Result type alias for Kelp application code
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
