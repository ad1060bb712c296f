//! Shared helpers for integration tests

#![allow(dead_code)]

use kelp::config::Config;
use kelp::flow::UserPreferences;
use kelp::planner::{PlannerSession, SessionContext};
use kelp::providers::fake::FakeProvider;
use serde_json::{json, Value};
use std::sync::Arc;

/// Config pointing the Gemini provider at `api_base` with a test key
pub fn gemini_config(api_base: &str) -> Config {
    let mut config = Config::default();
    config.provider.provider_type = "gemini".to_string();
    config.provider.gemini.api_base = api_base.to_string();
    config.provider.gemini.api_key = Some("integration-key".to_string());
    config.provider.request_timeout_seconds = 5;
    config
}

/// Config pointing the Ollama provider at `host`
pub fn ollama_config(host: &str) -> Config {
    let mut config = Config::default();
    config.provider.provider_type = "ollama".to_string();
    config.provider.ollama.host = host.to_string();
    config.provider.request_timeout_seconds = 5;
    config
}

pub fn scenario_a_preferences() -> UserPreferences {
    UserPreferences::new("Austin", "chill date night")
}

/// A raw stop as the model would return it
pub fn raw_stop(name: &str, price: &str, minutes: Option<u32>) -> Value {
    let mut stop = json!({
        "businessName": name,
        "category": "Cocktail Bar",
        "rating": 4.6,
        "reviewCount": 812,
        "price": price,
        "reason": format!("{} keeps things relaxed", name)
    });
    if let Some(m) = minutes {
        stop["durationMinutes"] = json!(m);
    }
    stop
}

/// The three-stop Austin plan used across scenarios
pub fn austin_reply() -> Value {
    json!({
        "title": "Eastside Slow Burn",
        "totalBudgetEstimate": "$60-90",
        "stops": [
            raw_stop("Whisler's", "$$", Some(90)),
            raw_stop("Suerte", "$$$", None),
            raw_stop("Sahara Lounge", "$$", Some(45))
        ]
    })
}

/// Wraps text as a Gemini `generateContent` response body
pub fn gemini_body(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

/// A session over a scripted provider that has already started scenario A
pub async fn started_session(provider: Arc<FakeProvider>) -> PlannerSession {
    let mut session = PlannerSession::new(
        provider,
        &Config::default(),
        SessionContext::new("Guest-4242"),
    );
    session
        .start(&scenario_a_preferences())
        .await
        .expect("scenario A should generate");
    session
}
