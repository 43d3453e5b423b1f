//! Tests for the `trip` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const REQUEST: &str = r#"{
    "userId": "family-42",
    "familyProfile": {
        "adults": 2,
        "children": 2,
        "ages": [8, 5],
        "interests": ["theme parks"]
    },
    "destination": "Orlando",
    "budget": 5000,
    "startDate": "2024-06-15",
    "endDate": "2024-06-22",
    "tripType": "vacation",
    "accommodationType": "hotel",
    "transportation": "flight"
}"#;

fn trip() -> Command {
    let mut cmd = Command::cargo_bin("trip").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_init_then_refuse_without_force() {
    let dir = tempdir().unwrap();

    trip()
        .args(["init", "--target"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains("weather.yaml"));

    trip()
        .args(["init", "--target"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    trip()
        .args(["init", "--force", "--minimal", "--target"])
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn test_plan_json_output() {
    let dir = tempdir().unwrap();
    let request = dir.path().join("request.json");
    fs::write(&request, REQUEST).unwrap();

    let output = trip()
        .args(["plan", "--json", "--root"])
        .arg(dir.path())
        .arg("--request")
        .arg(&request)
        .output()
        .unwrap();

    assert!(output.status.success());
    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["data"]["summary"]["destination"], "Orlando");
    assert_eq!(response["data"]["summary"]["duration"], 7);
    assert!(response.get("error").is_none());
}

#[test]
fn test_plan_renders_itinerary() {
    let dir = tempdir().unwrap();

    trip()
        .args(["plan", "--request", "-", "--root"])
        .arg(dir.path())
        .write_stdin(REQUEST)
        .assert()
        .success()
        .stdout(predicate::str::contains("Family trip to Orlando"))
        .stdout(predicate::str::contains("Day 1:"))
        .stderr(predicate::str::contains("plan ready"));
}

#[test]
fn test_plan_rejects_invalid_request() {
    let dir = tempdir().unwrap();
    let request = dir.path().join("request.json");
    fs::write(
        &request,
        r#"{ "familyProfile": { "adults": 2 }, "startDate": "2024-06-22", "endDate": "2024-06-15" }"#,
    )
    .unwrap();

    let output = trip()
        .args(["plan", "--json", "--root"])
        .arg(dir.path())
        .arg("--request")
        .arg(&request)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["success"], false);
    assert!(response.get("data").is_none());
    assert!(response["error"].is_string());
}

#[test]
fn test_health_reports_every_capability() {
    let dir = tempdir().unwrap();

    let output = trip()
        .args(["health", "--json", "--root"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "healthy");
    let providers = report["providers"].as_object().unwrap();
    assert_eq!(providers.len(), 5);
    assert!(providers.contains_key("weather"));
}

#[test]
fn test_health_fails_with_unusable_provider() {
    let dir = tempdir().unwrap();
    let providers = dir.path().join(".trip-planner/providers");
    fs::create_dir_all(&providers).unwrap();
    fs::write(
        providers.join("weather.yaml"),
        "name: live-weather\ncapability: weather\nkind: http\nbase-url: http://127.0.0.1:9\napi-key-env: TRIP_CLI_TEST_UNSET_KEY\n",
    )
    .unwrap();

    trip()
        .args(["health", "--root"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Providers: unhealthy"))
        .stdout(predicate::str::contains("live-weather"));
}
