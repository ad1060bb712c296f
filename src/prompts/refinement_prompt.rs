//! Instruction for refining an existing flow from a chat message

use crate::error::KelpError;
use crate::flow::Flow;

/// Builds the refinement instruction
///
/// The model decides whether the message changes the itinerary; this function
/// only states the rule.
///
/// # Errors
///
/// Returns `KelpError::Serialization` if the flow cannot be rendered as JSON
pub fn build_refinement_prompt(current: &Flow, message: &str) -> Result<String, KelpError> {
    let flow_json = serde_json::to_string(current)?;

    Ok(format!(
        r#"You are Kelp, a nightlife assistant.
Current Flow Context: {flow_json}
User Request: "{message}"

If the user request implies changing the itinerary (e.g., "swap the second stop", "make it cheaper", "find a place with patio"),
you must output JSON with an "updatedFlow" property matching the flow schema, and a "text" property explaining the change.

If it's just a general question (e.g., "what is the dress code?"), just return JSON with "text" and null for "updatedFlow".

ALWAYS provide "suggestedActions": A list of 3-4 short, specific follow-up options for the user based on the new state (e.g. "Find a dessert spot", "Make it walkable", "Swap dinner for tacos")."#,
        flow_json = flow_json,
        message = message.trim(),
    ))
}
