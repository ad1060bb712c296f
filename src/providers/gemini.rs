//! Google Gemini provider implementation for Kelp
//!
//! Talks to the `generateContent` endpoint with a JSON response mime type and
//! a `responseSchema` built from the request's declared shape. The API key is
//! resolved from config, the environment, or the system keyring.

use crate::config::GeminiConfig;
use crate::error::{KelpError, Result};
use crate::flow::{HistoryEntry, Role};
use crate::providers::{Provider, StructuredRequest};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Keyring service under which the Gemini API key is stored
pub const KEYRING_SERVICE: &str = "kelp";
/// Keyring user for the Gemini API key
pub const KEYRING_USER: &str = "gemini";
/// Environment variable consulted after config
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Google Gemini API provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

/// Resolve the Gemini API key
///
/// Looks at the configured key first, then `GEMINI_API_KEY`, then the system
/// keyring entry written by `kelp auth`.
///
/// # Errors
///
/// Returns `KelpError::MissingCredentials` when no source yields a key
pub fn resolve_api_key(config: &GeminiConfig) -> Result<String> {
    if let Some(key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            tracing::debug!("Using Gemini API key from {}", API_KEY_ENV);
            return Ok(key);
        }
    }

    match keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).and_then(|e| e.get_password()) {
        Ok(key) if !key.trim().is_empty() => {
            tracing::debug!("Using Gemini API key from system keyring");
            Ok(key)
        }
        Ok(_) => Err(KelpError::MissingCredentials("gemini".to_string()).into()),
        Err(e) => {
            tracing::debug!("No Gemini API key in keyring: {}", e);
            Err(KelpError::MissingCredentials("gemini".to_string()).into())
        }
    }
}

/// Store the Gemini API key in the system keyring
pub fn store_api_key(key: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    entry.set_password(key)?;
    tracing::info!("Stored Gemini API key in system keyring");
    Ok(())
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Arguments
    ///
    /// * `config` - Gemini configuration (model, API base, optional key)
    /// * `timeout` - Per-request HTTP timeout
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if no API key can be found, or a provider
    /// error if the HTTP client cannot be built
    pub fn new(config: GeminiConfig, timeout: Duration) -> Result<Self> {
        let api_key = resolve_api_key(&config)?;
        Self::with_api_key(config, api_key, timeout)
    }

    /// Create a provider with an explicit API key
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::config::GeminiConfig;
    /// use kelp::providers::GeminiProvider;
    /// use std::time::Duration;
    ///
    /// let provider = GeminiProvider::with_api_key(
    ///     GeminiConfig::default(),
    ///     "test-key".to_string(),
    ///     Duration::from_secs(5),
    /// );
    /// assert!(provider.is_ok());
    /// ```
    pub fn with_api_key(config: GeminiConfig, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kelp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KelpError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized Gemini provider: model={}", config.model);

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    fn convert_history(history: &[HistoryEntry], instruction: &str) -> Vec<GeminiContent> {
        history
            .iter()
            .map(|entry| (entry.role, entry.content.as_str()))
            .chain(std::iter::once((Role::User, instruction)))
            .map(|(role, text)| GeminiContent {
                role: Some(
                    match role {
                        Role::User => "user",
                        Role::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: Some(text.to_string()),
                    thought: None,
                }],
            })
            .collect()
    }

    fn build_request(request: &StructuredRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: Self::convert_history(&request.history, &request.instruction),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.shape.to_gemini_schema(),
                thinking_config: request
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
            },
        }
    }

    /// Joins the non-thought text parts of the first candidate
    fn extract_text(response: GenerateContentResponse) -> Result<String> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| KelpError::Provider("Gemini returned no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|part| !part.thought.unwrap_or(false))
            .filter_map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            return Err(KelpError::Provider(format!(
                "Gemini returned no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
            .into());
        }

        Ok(text)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete_structured(&self, request: &StructuredRequest) -> Result<String> {
        let body = Self::build_request(request);

        tracing::debug!(
            "Sending Gemini request: {} contents, thinking_budget={:?}",
            body.contents.len(),
            request.thinking_budget
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                KelpError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(KelpError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            KelpError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        if let Some(usage) = &parsed.usage_metadata {
            tracing::debug!(
                "Gemini usage: prompt_tokens={}, completion_tokens={}",
                usage.prompt_token_count,
                usage.candidates_token_count
            );
        }

        Self::extract_text(parsed)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn get_current_model(&self) -> Result<String> {
        Ok(self.config.model.clone())
    }
}
