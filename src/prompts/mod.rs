//! Prompts and declared response shapes
//!
//! Each planner request pairs a natural-language instruction with the shape
//! the reply must take. Instructions live in the submodules; the shapes are
//! shared because a refinement may carry a whole replacement flow.

pub mod generation_prompt;
pub mod refinement_prompt;

pub use generation_prompt::build_generation_prompt;
pub use refinement_prompt::build_refinement_prompt;

use crate::providers::ResponseShape;

/// Properties a flow reply carries, in the order the model should emit them
fn flow_properties() -> Vec<(&'static str, ResponseShape)> {
    let stop = ResponseShape::object(vec![
        ("businessName", ResponseShape::string()),
        ("category", ResponseShape::string()),
        ("rating", ResponseShape::number()),
        ("reviewCount", ResponseShape::number()),
        ("price", ResponseShape::string()),
        (
            "reason",
            ResponseShape::string()
                .describe("Why this stop fits the user's specific vibe/request"),
        ),
        (
            "durationMinutes",
            ResponseShape::number().describe("Approximate time to spend here"),
        ),
    ]);

    vec![
        (
            "title",
            ResponseShape::string().describe("A catchy title for the night out"),
        ),
        (
            "totalBudgetEstimate",
            ResponseShape::string().describe("Estimated total cost range (e.g., $50-80)"),
        ),
        ("stops", ResponseShape::array(stop)),
    ]
}

/// Shape of a generation reply
///
/// # Examples
///
/// ```
/// use kelp::prompts::flow_shape;
///
/// let shape = flow_shape();
/// assert!(shape.field("stops").is_some());
/// assert!(shape.field("text").is_none());
/// ```
pub fn flow_shape() -> ResponseShape {
    ResponseShape::object(flow_properties())
}

/// Shape of a refinement reply
pub fn refinement_shape() -> ResponseShape {
    ResponseShape::object(vec![
        ("text", ResponseShape::string()),
        (
            "suggestedActions",
            ResponseShape::array(ResponseShape::string())
                .describe("3-4 short follow-up actions for the user."),
        ),
        (
            "updatedFlow",
            ResponseShape::object(flow_properties()).nullable(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ShapeKind;

    #[test]
    fn test_flow_shape_stop_fields() {
        let shape = flow_shape();
        let stops = shape.field("stops").unwrap();
        let ShapeKind::Array(stop) = &stops.kind else {
            panic!("stops should be an array");
        };
        for name in [
            "businessName",
            "category",
            "rating",
            "reviewCount",
            "price",
            "reason",
            "durationMinutes",
        ] {
            assert!(stop.field(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_refinement_shape_updated_flow_is_nullable() {
        let shape = refinement_shape();
        let updated = shape.field("updatedFlow").unwrap();
        assert!(updated.nullable);
        assert!(updated.field("stops").is_some());
        assert!(!shape.field("text").unwrap().nullable);
    }

    #[test]
    fn test_refinement_shape_renders_for_gemini() {
        let schema = refinement_shape().to_gemini_schema();
        assert_eq!(
            schema["properties"]["suggestedActions"]["description"],
            "3-4 short follow-up actions for the user."
        );
        assert_eq!(schema["properties"]["updatedFlow"]["nullable"], true);
    }
}
