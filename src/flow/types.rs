//! Canonical itinerary types
//!
//! These are only ever produced by [`crate::flow::normalize`]; nothing else in
//! the crate builds a `Flow` from model output.

use serde::{Deserialize, Serialize};

/// Optional geocoordinates of a stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One venue or activity in a flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStop {
    /// Unique within the owning flow
    pub id: String,
    /// 1-based position in the flow
    pub order: u32,
    pub business_name: String,
    pub category: String,
    /// 0.0 to 5.0
    pub rating: f64,
    pub review_count: u32,
    /// Symbolic price tier such as `$$`
    pub price: String,
    pub image_url: String,
    pub yelp_url: String,
    /// Why this stop fits the user's vibe
    pub reason: String,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// A complete itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub id: String,
    pub title: String,
    /// Sum of every stop's duration, in minutes
    pub total_duration: u32,
    /// Free text range such as `$50-80`
    pub total_budget_estimate: String,
    pub stops: Vec<FlowStop>,
    /// Where the flow takes place; used to build search links on refinement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Flow {
    /// Total duration in hours, for display
    ///
    /// # Examples
    ///
    /// ```
    /// use kelp::flow::Flow;
    ///
    /// let flow = Flow {
    ///     id: "flow-1".to_string(),
    ///     title: "Night out".to_string(),
    ///     total_duration: 195,
    ///     total_budget_estimate: "$50-80".to_string(),
    ///     stops: Vec::new(),
    ///     location: None,
    /// };
    /// assert!((flow.total_hours() - 3.25).abs() < f64::EPSILON);
    /// ```
    pub fn total_hours(&self) -> f64 {
        f64::from(self.total_duration) / 60.0
    }

    pub fn first_stop(&self) -> Option<&FlowStop> {
        self.stops.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(order: u32, duration: u32) -> FlowStop {
        FlowStop {
            id: format!("stop-{}", order),
            order,
            business_name: format!("Place {}", order),
            category: "Bar".to_string(),
            rating: 4.5,
            review_count: 120,
            price: "$$".to_string(),
            image_url: String::new(),
            yelp_url: String::new(),
            reason: "fits".to_string(),
            duration_minutes: duration,
            coordinates: None,
        }
    }

    fn flow(stops: Vec<FlowStop>, total: u32) -> Flow {
        Flow {
            id: "flow-1".to_string(),
            title: "Test".to_string(),
            total_duration: total,
            total_budget_estimate: "$$".to_string(),
            stops,
            location: Some("Austin".to_string()),
        }
    }

    #[test]
    fn test_flow_serializes_camel_case() {
        let value = serde_json::to_value(flow(vec![stop(1, 60)], 60)).unwrap();
        assert!(value.get("totalDuration").is_some());
        assert!(value.get("totalBudgetEstimate").is_some());
        assert!(value["stops"][0].get("businessName").is_some());
        assert!(value["stops"][0].get("durationMinutes").is_some());
        assert!(value["stops"][0].get("coordinates").is_none());
    }

    #[test]
    fn test_first_stop() {
        let f = flow(vec![stop(1, 60), stop(2, 30)], 90);
        assert_eq!(f.first_stop().unwrap().business_name, "Place 1");
    }
}
