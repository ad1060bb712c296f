//! Conversation messages exchanged while refining a flow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message reduced to what the hosted model needs for continuity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl HistoryEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// One turn in the refinement conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Short follow-up prompts offered after an assistant turn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_actions: Vec<String>,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::flow::{Message, Role};
    ///
    /// let msg = Message::user("make it cheaper");
    /// assert_eq!(msg.role, Role::User);
    /// assert!(msg.suggested_actions.is_empty());
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), Vec::new())
    }

    /// Creates a new assistant message with follow-up suggestions
    pub fn assistant(content: impl Into<String>, suggested_actions: Vec<String>) -> Self {
        Self::new(Role::Assistant, content.into(), suggested_actions)
    }

    fn new(role: Role, content: String, suggested_actions: Vec<String>) -> Self {
        Self {
            id: format!("msg-{}", Uuid::new_v4()),
            role,
            content,
            timestamp: Utc::now(),
            suggested_actions,
        }
    }

    /// Strips timestamp, id and suggestions
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry::new(self.role, self.content.clone())
    }
}
