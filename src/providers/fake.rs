//! In-process fake provider for planner unit and integration tests
//!
//! [`FakeProvider`] replays a script of canned replies in order and records
//! every request it receives, so tests can drive generation and refinement
//! without network I/O and then assert on what was sent.
//!
//! # Example
//!
//! ```
//! use kelp::providers::fake::FakeProvider;
//! use kelp::providers::{Provider, ResponseShape, StructuredRequest};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = FakeProvider::new()
//!     .with_reply(r#"{"text":"hi"}"#)
//!     .with_error("upstream timeout");
//!
//! let request = StructuredRequest::new("Say hi", ResponseShape::string());
//! assert_eq!(provider.complete_structured(&request).await.unwrap(), r#"{"text":"hi"}"#);
//! assert!(provider.complete_structured(&request).await.is_err());
//! assert_eq!(provider.call_count(), 2);
//! # }
//! ```

use crate::error::{KelpError, Result};
use crate::providers::{Provider, StructuredRequest};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// One scripted outcome
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// Return this text verbatim
    Text(String),
    /// Fail with a provider error carrying this message
    Error(String),
}

/// Scripted provider
#[derive(Debug, Default)]
pub struct FakeProvider {
    replies: Mutex<VecDeque<FakeReply>>,
    requests: Mutex<Vec<StructuredRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(FakeReply::Text(text.into()));
        self
    }

    /// Queue a JSON value, serialized as the reply text
    pub fn with_json(self, value: serde_json::Value) -> Self {
        self.with_reply(value.to_string())
    }

    /// Queue a failure
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(FakeReply::Error(message.into()));
        self
    }

    pub fn push(&self, reply: FakeReply) {
        lock(&self.replies).push_back(reply);
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<StructuredRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<StructuredRequest> {
        lock(&self.requests).last().cloned()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Replies not yet consumed
    pub fn remaining(&self) -> usize {
        lock(&self.replies).len()
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn complete_structured(&self, request: &StructuredRequest) -> Result<String> {
        lock(&self.requests).push(request.clone());

        match lock(&self.replies).pop_front() {
            Some(FakeReply::Text(text)) => Ok(text),
            Some(FakeReply::Error(message)) => Err(KelpError::Provider(message).into()),
            None => Err(KelpError::Provider("FakeProvider script exhausted".to_string()).into()),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }

    fn get_current_model(&self) -> Result<String> {
        Ok("fake-model".to_string())
    }
}
