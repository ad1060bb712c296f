//! Binary-level tests for the kelp command line

mod common;

use assert_cmd::Command;
use common::austin_reply;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MISSING_CONFIG: &str = "does/not/exist/config.yaml";

fn kelp() -> Command {
    let mut cmd = Command::cargo_bin("kelp").unwrap();
    cmd.env_remove("KELP_CONFIG")
        .env_remove("KELP_PROVIDER")
        .env_remove("RUST_LOG")
        .args(["--config", MISSING_CONFIG]);
    cmd
}

#[test]
fn test_help_lists_commands() {
    kelp()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("auth"));
}

#[test]
fn test_version_flag() {
    kelp()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_plan_without_vibe_fails() {
    kelp()
        .args(["--provider", "ollama", "plan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--vibe"));
}

#[test]
fn test_plan_rejects_unknown_budget() {
    kelp()
        .args(["plan", "--vibe", "dive bars", "--budget", "lavish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lavish"));
}

#[test]
fn test_unknown_provider_in_config_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(file, "provider:\n  type: carrier-pigeon").unwrap();

    Command::cargo_bin("kelp")
        .unwrap()
        .env_remove("KELP_PROVIDER")
        .arg("--config")
        .arg(&config_path)
        .args(["plan", "--vibe", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("carrier-pigeon"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plan_json_against_ollama() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": austin_reply().to_string() },
            "done": true
        })))
        .mount(&server)
        .await;

    let output = kelp()
        .env("KELP_OLLAMA_HOST", server.uri())
        .args([
            "--provider",
            "ollama",
            "plan",
            "--vibe",
            "chill date night",
            "--location",
            "Austin",
            "--json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let flow: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(flow["title"], "Eastside Slow Burn");
    assert_eq!(flow["totalDuration"], 195);
    assert_eq!(flow["stops"].as_array().unwrap().len(), 3);
}
