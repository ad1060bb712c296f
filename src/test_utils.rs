//! Test utilities for Kelp
//!
//! Fixtures for flows and model replies, plus temporary config files.

use crate::config::Config;
use crate::flow::{Flow, FlowStop};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Write a config file into `dir` and return its path as a string
pub fn write_config(dir: &TempDir, yaml: &str) -> String {
    let path: PathBuf = dir.path().join("config.yaml");
    std::fs::write(&path, yaml).expect("Failed to write test config");
    path.to_string_lossy().to_string()
}

/// Default configuration with a placeholder Gemini key
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.provider.gemini.api_key = Some("test-key".to_string());
    config
}

/// A raw flow reply with one stop per name
///
/// Durations cycle through 90, absent and 45 minutes.
pub fn flow_reply(title: &str, names: &[&str]) -> Value {
    let stops: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut stop = json!({
                "businessName": name,
                "category": "Bar",
                "rating": 4.5,
                "reviewCount": 120,
                "price": "$$",
                "reason": format!("{} fits the mood", name)
            });
            match idx % 3 {
                0 => stop["durationMinutes"] = json!(90),
                2 => stop["durationMinutes"] = json!(45),
                _ => {}
            }
            stop
        })
        .collect();
    json!({ "title": title, "totalBudgetEstimate": "$50-80", "stops": stops })
}

/// A normalized flow with the given stop names, 60 minutes each
pub fn sample_flow(location: Option<&str>, names: &[&str]) -> Flow {
    let stops: Vec<FlowStop> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| FlowStop {
            id: format!("stop-{}", idx + 1),
            order: idx as u32 + 1,
            business_name: name.to_string(),
            category: "Bar".to_string(),
            rating: 4.0,
            review_count: 50,
            price: "$$".to_string(),
            image_url: format!("https://picsum.photos/400/300?random={}", idx),
            yelp_url: String::new(),
            reason: String::new(),
            duration_minutes: 60,
            coordinates: None,
        })
        .collect();
    Flow {
        id: "flow-sample".to_string(),
        title: "Sample Night".to_string(),
        total_duration: 60 * stops.len() as u32,
        total_budget_estimate: "$40-60".to_string(),
        stops,
        location: location.map(str::to_string),
    }
}
