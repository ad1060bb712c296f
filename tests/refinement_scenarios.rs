//! Chat refinement through a planner session

mod common;

use common::{austin_reply, raw_stop, started_session};
use kelp::error::KelpError;
use kelp::flow::Role;
use kelp::planner::session::FALLBACK_SUGGESTIONS;
use kelp::providers::fake::{FakeProvider, FakeReply};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_scenario_b_make_it_cheaper_keeps_title() {
    let provider = Arc::new(FakeProvider::new().with_json(austin_reply()));
    let mut session = started_session(provider.clone()).await;
    let original_title = session.flow().unwrap().title.clone();

    provider.push(FakeReply::Text(
        json!({
            "text": "Swapped in cheaper spots.",
            "updatedFlow": {
                "stops": [
                    raw_stop("Cheer Up Charlies", "$", Some(60)),
                    raw_stop("Veracruz All Natural", "$", Some(30)),
                    raw_stop("Hotel Vegas", "$", None)
                ]
            },
            "suggestedActions": ["Add dessert", "Make it walkable"]
        })
        .to_string(),
    ));

    let outcome = session.send_message("make it cheaper").await.unwrap();
    assert!(outcome.flow_updated);
    assert_eq!(outcome.reply.content, "Swapped in cheaper spots.");

    let flow = session.flow().unwrap();
    assert_eq!(flow.title, original_title);
    assert_eq!(flow.total_budget_estimate, "$60-90");
    let orders: Vec<u32> = flow.stops.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert_eq!(flow.total_duration, 150);
    assert!(flow.stops.iter().all(|s| s.price == "$"));
    assert!(flow.stops[0].yelp_url.contains("find_loc=Austin"));

    assert_eq!(session.latest_suggestions(), ["Add dessert", "Make it walkable"]);
}

#[tokio::test]
async fn test_scenario_c_question_leaves_flow_alone() {
    let provider = Arc::new(FakeProvider::new().with_json(austin_reply()));
    let mut session = started_session(provider.clone()).await;
    let before = session.flow().unwrap().clone();

    provider.push(FakeReply::Text(
        json!({
            "text": "Smart casual works everywhere on this list.",
            "updatedFlow": null,
            "suggestedActions": ["Find a dessert spot"]
        })
        .to_string(),
    ));

    let outcome = session
        .send_message("what is the dress code at Suerte?")
        .await
        .unwrap();
    assert!(!outcome.flow_updated);
    assert!(outcome.reply.content.contains("Smart casual"));
    assert_eq!(session.flow().unwrap(), &before);

    let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
}

#[tokio::test]
async fn test_failed_turn_is_non_destructive() {
    let provider = Arc::new(
        FakeProvider::new()
            .with_json(austin_reply())
            .with_error("upstream unavailable")
            .with_reply("not json at all"),
    );
    let mut session = started_session(provider).await;
    let before = session.flow().unwrap().clone();

    for _ in 0..2 {
        let err = session.send_message("swap the second stop").await.unwrap_err();
        assert!(matches!(err, KelpError::Refinement(_)));
    }
    assert_eq!(session.flow().unwrap(), &before);
    assert_eq!(session.messages().len(), 1);
}

#[tokio::test]
async fn test_malformed_updated_flow_keeps_current_and_falls_back() {
    let provider = Arc::new(
        FakeProvider::new()
            .with_json(austin_reply())
            .with_json(json!({ "updatedFlow": { "stops": [{ "category": "Bar" }] } })),
    );
    let mut session = started_session(provider).await;
    let before = session.flow().unwrap().clone();

    let outcome = session.send_message("add a bar").await.unwrap();
    assert!(!outcome.flow_updated);
    assert_eq!(session.flow().unwrap(), &before);
    assert_eq!(session.latest_suggestions(), FALLBACK_SUGGESTIONS);
}

#[tokio::test]
async fn test_history_is_sent_with_each_turn() {
    let provider = Arc::new(
        FakeProvider::new()
            .with_json(austin_reply())
            .with_json(json!({ "text": "Sure." }))
            .with_json(json!({ "text": "Still sure." })),
    );
    let mut session = started_session(provider.clone()).await;

    session.send_message("first question").await.unwrap();
    session.send_message("second question").await.unwrap();

    let last = provider.last_request().unwrap();
    assert_eq!(last.history.len(), 3);
    assert!(last.instruction.contains("second question"));
    assert!(last.instruction.contains("Eastside Slow Burn"));
}

#[tokio::test]
async fn test_clear_then_start_over() {
    let provider = Arc::new(
        FakeProvider::new()
            .with_json(austin_reply())
            .with_json(json!({ "text": "Noted." })),
    );
    let mut session = started_session(provider).await;
    session.send_message("sounds fun").await.unwrap();

    let cleared = session.clear_chat().unwrap();
    assert!(cleared.content.contains("Eastside Slow Burn"));
    assert_eq!(session.messages().len(), 1);

    let dropped = session.start_over().unwrap();
    assert_eq!(dropped.title, "Eastside Slow Burn");
    assert!(session.flow().is_none());
    assert_eq!(session.messages().len(), 1);

    assert!(matches!(
        session.send_message("hello?").await,
        Err(KelpError::NoActiveFlow)
    ));
    assert!(matches!(session.clear_chat(), Err(KelpError::NoActiveFlow)));
}
