//! Planner session state
//!
//! A session owns at most one active flow and the conversation about it.
//! Generation and accepted refinements replace the flow whole; a failed turn
//! leaves both the flow and the conversation exactly as they were.

use crate::config::Config;
use crate::error::KelpError;
use crate::flow::{Flow, HistoryEntry, Message, UserPreferences};
use crate::planner::{ItineraryGenerator, ItineraryRefiner};
use crate::providers::Provider;

use rand::Rng;
use std::sync::Arc;

/// Suggestions offered with the first message about a new flow
pub const INITIAL_SUGGESTIONS: [&str; 4] = [
    "Swap the first stop",
    "Make it cheaper",
    "Add a dessert spot",
    "Is it walkable?",
];

/// Suggestions used when a refinement reply carries none
pub const FALLBACK_SUGGESTIONS: [&str; 3] = ["Any other options?", "Change the time", "Looks good!"];

/// Suggestions offered after the chat is cleared
pub const CLEARED_SUGGESTIONS: [&str; 3] = ["Change the budget", "Swap a stop", "Start over"];

fn owned(actions: &[&str]) -> Vec<String> {
    actions.iter().map(|s| s.to_string()).collect()
}

/// Identity of the person using a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: String,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    /// A fresh anonymous identity of the form `Guest-NNNN`
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::planner::SessionContext;
    ///
    /// let ctx = SessionContext::guest();
    /// assert!(ctx.session_id.starts_with("Guest-"));
    /// ```
    pub fn guest() -> Self {
        let number: u32 = rand::rng().random_range(1000..=9999);
        Self::new(format!("Guest-{}", number))
    }
}

/// What one chat turn produced
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// The assistant message appended to the conversation
    pub reply: Message,
    /// Whether the active flow was replaced
    pub flow_updated: bool,
}

/// One user's planning conversation
pub struct PlannerSession {
    context: SessionContext,
    generator: ItineraryGenerator,
    refiner: ItineraryRefiner,
    history_limit: Option<usize>,
    flow: Option<Flow>,
    messages: Vec<Message>,
}

impl PlannerSession {
    /// Creates a session with no flow
    ///
    /// # Arguments
    ///
    /// * `provider` - Hosted model shared by generation and refinement
    /// * `config` - Planner settings and the generation thinking budget
    /// * `context` - Identity of the session's user
    pub fn new(provider: Arc<dyn Provider>, config: &Config, context: SessionContext) -> Self {
        let thinking_budget = match config.provider.provider_type.as_str() {
            "gemini" => config.provider.gemini.thinking_budget,
            _ => None,
        };
        let generator = ItineraryGenerator::new(provider.clone(), &config.planner)
            .with_thinking_budget(thinking_budget);
        let refiner = ItineraryRefiner::new(provider, config.planner.max_suggested_actions);

        tracing::debug!(session = %context.session_id, "Created planner session");

        Self {
            context,
            generator,
            refiner,
            history_limit: config.planner.history_limit,
            flow: None,
            messages: Vec::new(),
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// The active flow, if any
    pub fn flow(&self) -> Option<&Flow> {
        self.flow.as_ref()
    }

    /// The conversation, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Suggestions attached to the latest assistant message
    pub fn latest_suggestions(&self) -> &[String] {
        self.messages
            .iter()
            .rev()
            .find(|m| !m.suggested_actions.is_empty())
            .map(|m| m.suggested_actions.as_slice())
            .unwrap_or(&[])
    }

    /// Generates a flow and starts a new conversation about it
    ///
    /// On success the previous flow and conversation are replaced by the new
    /// flow and a single assistant message introducing it.
    ///
    /// # Errors
    ///
    /// Returns `KelpError::InvalidPreferences` before any request if the
    /// preferences are invalid, or `KelpError::Generation` if generation
    /// fails. The session is unchanged in both cases.
    pub async fn start(&mut self, prefs: &UserPreferences) -> Result<&Flow, KelpError> {
        prefs.validate()?;
        let flow = self.generator.generate(prefs).await?;

        let intro = format!(
            "I've put together a {}-stop plan for your \"{}\" night in {}. It starts at {}. How does this look?",
            flow.stops.len(),
            prefs.vibe.trim(),
            prefs.location().unwrap_or("town"),
            flow.first_stop().map(|s| s.business_name.as_str()).unwrap_or("the first stop"),
        );
        self.messages = vec![Message::assistant(intro, owned(&INITIAL_SUGGESTIONS))];

        tracing::info!(session = %self.context.session_id, flow_id = %flow.id, "Started flow");
        Ok(self.flow.insert(flow))
    }

    /// Sends a chat message about the active flow
    ///
    /// The user message and the reply are appended together only when the
    /// turn succeeds. A reply that proposes a valid replacement swaps the
    /// active flow; any other reply keeps it.
    ///
    /// # Errors
    ///
    /// Returns `KelpError::NoActiveFlow` without a flow, or
    /// `KelpError::Refinement` if the message is blank or the turn fails
    pub async fn send_message(&mut self, text: &str) -> Result<TurnOutcome, KelpError> {
        let current = self.flow.as_ref().ok_or(KelpError::NoActiveFlow)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(KelpError::Refinement("message is empty".to_string()));
        }

        let history = self.history();
        let refinement = self.refiner.refine(current, &history, text).await?;

        let suggestions = if refinement.suggested_actions.is_empty() {
            owned(&FALLBACK_SUGGESTIONS)
        } else {
            refinement.suggested_actions
        };
        let reply = Message::assistant(refinement.reply_text, suggestions);

        self.messages.push(Message::user(text));
        self.messages.push(reply.clone());

        let flow_updated = match refinement.updated_flow {
            Some(flow) => {
                tracing::info!(
                    session = %self.context.session_id,
                    flow_id = %flow.id,
                    stops = flow.stops.len(),
                    "Replaced active flow"
                );
                self.flow = Some(flow);
                true
            }
            None => false,
        };

        Ok(TurnOutcome {
            reply,
            flow_updated,
        })
    }

    /// Resets the conversation to one message re-anchored on the active flow
    ///
    /// # Errors
    ///
    /// Returns `KelpError::NoActiveFlow` if there is nothing to talk about
    pub fn clear_chat(&mut self) -> Result<&Message, KelpError> {
        let flow = self.flow.as_ref().ok_or(KelpError::NoActiveFlow)?;
        let message = Message::assistant(
            format!(
                "Chat cleared. We're still looking at your plan for {}. What would you like to tweak?",
                flow.title
            ),
            owned(&CLEARED_SUGGESTIONS),
        );
        self.messages = vec![message];
        Ok(&self.messages[0])
    }

    /// Drops the active flow; the conversation stays until cleared
    pub fn start_over(&mut self) -> Option<Flow> {
        tracing::debug!(session = %self.context.session_id, "Starting over");
        self.flow.take()
    }

    fn history(&self) -> Vec<HistoryEntry> {
        let skip = self
            .history_limit
            .map(|limit| self.messages.len().saturating_sub(limit))
            .unwrap_or(0);
        self.messages[skip..]
            .iter()
            .map(Message::to_history_entry)
            .collect()
    }
}
