//! Ollama provider implementation for Kelp
//!
//! This module implements the Provider trait for Ollama, connecting to a local
//! or remote Ollama server. Structured output uses the `format` field of
//! `/api/chat` with a JSON Schema rendering of the declared response shape.

use crate::config::OllamaConfig;
use crate::error::{KelpError, Result};
use crate::flow::{HistoryEntry, Role};
use crate::providers::{Provider, StructuredRequest};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// # Examples
///
/// ```no_run
/// use kelp::config::OllamaConfig;
/// use kelp::providers::{OllamaProvider, Provider, ResponseShape, StructuredRequest};
/// use std::time::Duration;
///
/// # async fn example() -> kelp::error::Result<()> {
/// let config = OllamaConfig {
///     host: "http://localhost:11434".to_string(),
///     model: "llama3.2:latest".to_string(),
/// };
/// let provider = OllamaProvider::new(config, Duration::from_secs(120))?;
/// let request = StructuredRequest::new("Say hi as JSON", ResponseShape::string());
/// let text = provider.complete_structured(&request).await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    format: serde_json::Value,
    stream: bool,
}

/// Message structure for Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Ollama configuration containing host and model
    /// * `timeout` - Per-request HTTP timeout
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::config::OllamaConfig;
    /// use kelp::providers::OllamaProvider;
    /// use std::time::Duration;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default(), Duration::from_secs(5));
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OllamaConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kelp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KelpError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn convert_messages(&self, history: &[HistoryEntry], instruction: &str) -> Vec<OllamaMessage> {
        history
            .iter()
            .map(|entry| OllamaMessage {
                role: entry.role.as_str().to_string(),
                content: entry.content.clone(),
            })
            .chain(std::iter::once(OllamaMessage {
                role: Role::User.as_str().to_string(),
                content: instruction.to_string(),
            }))
            .collect()
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn complete_structured(&self, request: &StructuredRequest) -> Result<String> {
        let url = format!("{}/api/chat", self.config.host.trim_end_matches('/'));

        let ollama_request = OllamaRequest {
            model: self.config.model.clone(),
            messages: self.convert_messages(&request.history, &request.instruction),
            format: request.shape.to_json_schema(),
            stream: false,
        };

        tracing::debug!(
            "Sending Ollama request: {} messages",
            ollama_request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                KelpError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(KelpError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            KelpError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            ollama_response.done,
            ollama_response.prompt_eval_count,
            ollama_response.eval_count
        );

        if ollama_response.message.content.trim().is_empty() {
            return Err(KelpError::Provider("Ollama returned an empty reply".to_string()).into());
        }

        Ok(ollama_response.message.content)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn get_current_model(&self) -> Result<String> {
        Ok(self.config.model.clone())
    }
}
