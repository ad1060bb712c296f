//! Instruction for generating a new flow from user preferences

use crate::flow::{StopBounds, UserPreferences};

/// Location phrase used when the user left it blank
pub const UNKNOWN_LOCATION: &str = "their city";

/// Builds the generation instruction
///
/// Every preference is embedded. The stop-count requirement mirrors the bounds
/// normalization will enforce on the reply.
///
/// # Arguments
///
/// * `prefs` - What the user asked for
/// * `bounds` - Stop-count bounds for the generated flow
///
/// # Examples
///
/// ```
/// use kelp::flow::{StopBounds, UserPreferences};
/// use kelp::prompts::generation_prompt::build_generation_prompt;
///
/// let prefs = UserPreferences::new("", "first date, nothing loud");
/// let prompt = build_generation_prompt(&prefs, StopBounds::new(2, Some(4)));
/// assert!(prompt.contains("their city"));
/// assert!(prompt.contains("2 to 4 distinct stops"));
/// ```
pub fn build_generation_prompt(prefs: &UserPreferences, bounds: StopBounds) -> String {
    let location = prefs.location().unwrap_or(UNKNOWN_LOCATION);
    let stop_range = match bounds.max {
        Some(max) if max == bounds.min => format!("exactly {}", max),
        Some(max) => format!("{} to {}", bounds.min, max),
        None => format!("at least {}", bounds.min),
    };

    format!(
        r#"Act as "Kelp", an expert nightlife planner powered by Yelp data.
Create a micro-itinerary (Flow) for a user in {location}.

User Context:
- Vibe/Scenario: "{vibe}"
- Budget: {symbol} ({label}, {range} per person)
- Time: {time}
- Group Size: {group_size}

Requirements:
1. Generate {stop_range} distinct stops that form a logical sequence (e.g., drinks -> dinner -> activity).
2. Use REAL businesses known to exist in the location.
3. Estimate ratings and review counts based on general knowledge of these popular spots (simulating Yelp data).
4. The "reason" should be personalized to the user's vibe."#,
        location = location,
        vibe = prefs.vibe.trim(),
        symbol = prefs.budget.symbol(),
        label = prefs.budget.label(),
        range = prefs.budget.range(),
        time = prefs.time.label(),
        group_size = prefs.group_size,
        stop_range = stop_range,
    )
}
