//! Itinerary refinement
//!
//! A chat message is sent together with the current flow and the prior
//! conversation. The model decides whether the message changes the plan; the
//! refiner only validates what comes back. A reply that cannot be read at all
//! fails the turn, while a proposed flow that does not normalize is dropped
//! and the turn degrades to a text-only reply.

use crate::error::KelpError;
use crate::flow::{normalize_flow, Flow, FlowDefaults, HistoryEntry, LinkSynthesizer, StopBounds};
use crate::planner::parse_reply;
use crate::prompts::{build_refinement_prompt, refinement_shape};
use crate::providers::{Provider, StructuredRequest};

use serde_json::{Map, Value};
use std::sync::Arc;

/// Reply text used when the model changed the plan but said nothing
pub const UPDATED_REPLY: &str = "I've updated the plan based on your request.";
/// Reply text used when the model neither changed the plan nor said anything
pub const UNCHANGED_REPLY: &str = "Your plan is unchanged. What else would you like to adjust?";

/// Result of one refinement turn
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    pub reply_text: String,
    /// Replacement flow; `None` means keep the current one
    pub updated_flow: Option<Flow>,
    pub suggested_actions: Vec<String>,
}

/// Applies chat messages to existing flows
pub struct ItineraryRefiner {
    provider: Arc<dyn Provider>,
    max_suggested_actions: usize,
}

impl ItineraryRefiner {
    pub fn new(provider: Arc<dyn Provider>, max_suggested_actions: usize) -> Self {
        Self {
            provider,
            max_suggested_actions,
        }
    }

    /// Runs one refinement turn
    ///
    /// # Arguments
    ///
    /// * `current` - The flow being discussed
    /// * `history` - Earlier turns, oldest first, not including `message`
    /// * `message` - What the user just said
    ///
    /// # Errors
    ///
    /// Returns `KelpError::Refinement` if the provider fails or its reply is
    /// not a JSON object. A malformed `updatedFlow` is not an error.
    pub async fn refine(
        &self,
        current: &Flow,
        history: &[HistoryEntry],
        message: &str,
    ) -> Result<Refinement, KelpError> {
        let instruction = build_refinement_prompt(current, message)
            .map_err(|e| KelpError::Refinement(e.to_string()))?;
        let request =
            StructuredRequest::new(instruction, refinement_shape()).with_history(history.to_vec());

        tracing::info!(
            provider = self.provider.name(),
            flow_id = %current.id,
            history = history.len(),
            "Refining flow"
        );

        let text = self
            .provider
            .complete_structured(&request)
            .await
            .map_err(|e| {
                tracing::error!("Flow refinement request failed: {:#}", e);
                KelpError::Refinement(e.to_string())
            })?;

        let raw = parse_reply(&text).map_err(|e| {
            tracing::error!("Flow refinement reply was not JSON: {}", e);
            KelpError::Refinement(format!("reply was not valid JSON: {}", e))
        })?;
        let reply = raw.as_object().ok_or_else(|| {
            KelpError::Refinement("reply was not a JSON object".to_string())
        })?;

        let updated_flow = self.updated_flow(current, reply);
        let reply_text = match reply.get("text").and_then(Value::as_str).map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ if updated_flow.is_some() => UPDATED_REPLY.to_string(),
            _ => UNCHANGED_REPLY.to_string(),
        };
        let suggested_actions = self.suggested_actions(reply);

        tracing::info!(
            flow_updated = updated_flow.is_some(),
            suggestions = suggested_actions.len(),
            "Refinement complete"
        );

        Ok(Refinement {
            reply_text,
            updated_flow,
            suggested_actions,
        })
    }

    fn updated_flow(&self, current: &Flow, reply: &Map<String, Value>) -> Option<Flow> {
        let raw = reply.get("updatedFlow").filter(|v| !v.is_null())?;
        let has_stops = raw
            .get("stops")
            .and_then(Value::as_array)
            .is_some_and(|stops| !stops.is_empty());
        if !has_stops {
            tracing::debug!("Refinement proposed a flow without stops, keeping current flow");
            return None;
        }

        let defaults = FlowDefaults::from_flow(current);
        let links = LinkSynthesizer::new(
            current.location.as_deref(),
            LinkSynthesizer::REFINEMENT_IMAGE_OFFSET,
        );
        match normalize_flow(raw, &defaults, &links, StopBounds::REFINEMENT) {
            Ok(flow) => Some(flow),
            Err(e) => {
                tracing::warn!("Discarding proposed flow: {}", e);
                None
            }
        }
    }

    fn suggested_actions(&self, reply: &Map<String, Value>) -> Vec<String> {
        reply
            .get("suggestedActions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .take(self.max_suggested_actions)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
