//! Itinerary generation
//!
//! One request per call: build the instruction, ask the provider for a
//! flow-shaped reply, normalize it. Any failure along the way surfaces as
//! `KelpError::Generation` and nothing is retried.

use crate::config::PlannerConfig;
use crate::error::KelpError;
use crate::flow::{
    normalize_flow, Flow, FlowDefaults, LinkSynthesizer, StopBounds, UserPreferences,
};
use crate::planner::parse_reply;
use crate::prompts::{build_generation_prompt, flow_shape};
use crate::providers::{Provider, StructuredRequest};

use std::sync::Arc;

/// Builds new flows from user preferences
pub struct ItineraryGenerator {
    provider: Arc<dyn Provider>,
    bounds: StopBounds,
    default_title: String,
    thinking_budget: Option<u32>,
}

impl ItineraryGenerator {
    /// Creates a generator
    ///
    /// # Arguments
    ///
    /// * `provider` - Hosted model used for every request
    /// * `config` - Stop bounds and default title
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::config::PlannerConfig;
    /// use kelp::planner::ItineraryGenerator;
    /// use kelp::providers::fake::FakeProvider;
    /// use std::sync::Arc;
    ///
    /// let generator = ItineraryGenerator::new(Arc::new(FakeProvider::new()), &PlannerConfig::default())
    ///     .with_thinking_budget(Some(1024));
    /// assert_eq!(generator.bounds().max, Some(4));
    /// ```
    pub fn new(provider: Arc<dyn Provider>, config: &PlannerConfig) -> Self {
        Self {
            provider,
            bounds: StopBounds::new(config.min_stops, Some(config.max_stops)),
            default_title: config.default_title.clone(),
            thinking_budget: None,
        }
    }

    pub fn with_thinking_budget(mut self, budget: Option<u32>) -> Self {
        self.thinking_budget = budget;
        self
    }

    pub fn bounds(&self) -> StopBounds {
        self.bounds
    }

    /// Generates a flow for the given preferences
    ///
    /// # Errors
    ///
    /// Returns `KelpError::Generation` if the provider fails, the reply is not
    /// JSON, or the reply does not normalize into a flow within the bounds
    pub async fn generate(&self, prefs: &UserPreferences) -> Result<Flow, KelpError> {
        let request = StructuredRequest::new(build_generation_prompt(prefs, self.bounds), flow_shape())
            .with_thinking_budget(self.thinking_budget);

        tracing::info!(
            provider = self.provider.name(),
            vibe = %prefs.vibe,
            budget = %prefs.budget,
            time = %prefs.time,
            group_size = prefs.group_size,
            "Generating flow"
        );

        let text = self
            .provider
            .complete_structured(&request)
            .await
            .map_err(|e| {
                tracing::error!("Flow generation request failed: {:#}", e);
                KelpError::Generation(e.to_string())
            })?;

        let raw = parse_reply(&text).map_err(|e| {
            tracing::error!("Flow generation reply was not JSON: {}", e);
            KelpError::Generation(format!("reply was not valid JSON: {}", e))
        })?;

        let defaults = FlowDefaults::new(self.default_title.clone(), prefs.budget.symbol());
        let links = LinkSynthesizer::new(prefs.location(), LinkSynthesizer::GENERATION_IMAGE_OFFSET);

        let flow = normalize_flow(&raw, &defaults, &links, self.bounds).map_err(|e| {
            tracing::warn!("Generated flow rejected: {}", e);
            KelpError::Generation(e.to_string())
        })?;

        tracing::info!(
            flow_id = %flow.id,
            stops = flow.stops.len(),
            total_minutes = flow.total_duration,
            "Generated flow"
        );

        Ok(flow)
    }
}
