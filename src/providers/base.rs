//! Base provider trait and request types for Kelp
//!
//! A provider is the hosted language model seen as one capability: given an
//! instruction, the preceding conversation and a declared response shape,
//! return text that should parse as JSON of that shape, or fail.

use crate::error::Result;
use crate::flow::HistoryEntry;
use crate::providers::ResponseShape;
use async_trait::async_trait;

/// A single structured-output request
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRequest {
    /// Natural-language instruction, sent as the final user turn
    pub instruction: String,
    /// Earlier turns, oldest first
    pub history: Vec<HistoryEntry>,
    /// Shape the reply must conform to
    pub shape: ResponseShape,
    /// Reasoning token budget for providers that support one
    pub thinking_budget: Option<u32>,
}

impl StructuredRequest {
    /// Creates a request with no history
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::providers::{ResponseShape, StructuredRequest};
    ///
    /// let request = StructuredRequest::new("Plan a night out", ResponseShape::string())
    ///     .with_thinking_budget(Some(1024));
    /// assert!(request.history.is_empty());
    /// assert_eq!(request.thinking_budget, Some(1024));
    /// ```
    pub fn new(instruction: impl Into<String>, shape: ResponseShape) -> Self {
        Self {
            instruction: instruction.into(),
            history: Vec::new(),
            shape,
            thinking_budget: None,
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }

    pub fn with_thinking_budget(mut self, budget: Option<u32>) -> Self {
        self.thinking_budget = budget;
        self
    }
}

/// Hosted language model capability
///
/// Implementations perform exactly one request per call; retries and
/// timeouts beyond the HTTP client's own are left to the caller.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Requests a reply conforming to `request.shape`
    ///
    /// # Returns
    ///
    /// The raw reply text. Callers parse and validate it.
    ///
    /// # Errors
    ///
    /// Returns `KelpError::Provider` on transport failure, a non-success
    /// status, or a reply without text
    async fn complete_structured(&self, request: &StructuredRequest) -> Result<String>;

    /// Short provider name used in logs and credentials lookup
    fn name(&self) -> &str;

    /// Get the name of the model in use
    fn get_current_model(&self) -> Result<String>;
}
