//! Flow planning core
//!
//! The generator turns preferences into a new flow, the refiner applies a chat
//! message to an existing flow, and the session ties both to a conversation.

pub mod generator;
pub mod refiner;
pub mod session;

pub use generator::ItineraryGenerator;
pub use refiner::{ItineraryRefiner, Refinement};
pub use session::{PlannerSession, SessionContext, TurnOutcome};

use serde_json::Value;

/// Parses model reply text as JSON
///
/// Local models sometimes wrap structured output in a Markdown code fence
/// even when a format is requested, so a single surrounding fence is removed.
///
/// # Examples
///
/// ```
/// use kelp::planner::parse_reply;
///
/// assert!(parse_reply("```json\n{\"a\": 1}\n```").unwrap().is_object());
/// assert!(parse_reply("not json").is_err());
/// ```
pub fn parse_reply(text: &str) -> Result<Value, serde_json::Error> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
        .map(|inner| inner.trim_start_matches("json").trim())
        .unwrap_or(trimmed);
    serde_json::from_str(unfenced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_plain_and_fenced() {
        assert_eq!(parse_reply(" {\"x\":2} ").unwrap()["x"], 2);
        assert_eq!(parse_reply("```\n[1]\n```").unwrap()[0], 1);
    }

    #[test]
    fn test_parse_reply_empty_is_error() {
        assert!(parse_reply("").is_err());
    }
}
