//! Provider module for Kelp
//!
//! This module contains the hosted model abstraction and implementations
//! for Google Gemini and Ollama, plus a scripted fake for tests.

pub mod base;
pub mod fake;
pub mod gemini;
pub mod ollama;
pub mod schema;

pub use base::{Provider, StructuredRequest};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use schema::{ResponseShape, ShapeKind};

use crate::config::ProviderConfig;
use crate::error::{KelpError, Result};

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider ("gemini" or "ollama")
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if provider type is invalid, credentials are missing,
/// or initialization fails
///
/// # Examples
///
/// ```
/// use kelp::config::ProviderConfig;
/// use kelp::providers::create_provider;
///
/// let config = ProviderConfig::default();
/// let provider = create_provider("ollama", &config).unwrap();
/// assert_eq!(provider.name(), "ollama");
/// assert!(create_provider("openai", &config).is_err());
/// ```
pub fn create_provider(provider_type: &str, config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    let timeout = config.request_timeout();
    match provider_type {
        "gemini" => Ok(Box::new(GeminiProvider::new(config.gemini.clone(), timeout)?)),
        "ollama" => Ok(Box::new(OllamaProvider::new(config.ollama.clone(), timeout)?)),
        _ => Err(KelpError::Provider(format!("Unknown provider type: {}", provider_type)).into()),
    }
}
