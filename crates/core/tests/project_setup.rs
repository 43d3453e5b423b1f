//! End-to-end tests from a scaffolded `.trip-planner/` directory.
//!
//! These tests verify that:
//! - `init` produces a project that loads and plans successfully
//! - A misconfigured provider is isolated by the health check
//! - Weather stays advisory when its provider is broken
//! - Concurrent runs in the registry are independent

mod common;

use common::*;
use std::sync::Arc;
use tempfile::tempdir;
use tp_core::config::{load_config, CONFIG_DIR};
use tp_core::engine::plan_trip;
use tp_core::init::{generate_trip_planner_structure, InitOptions};
use tp_core::request::{into_context, parse_request};
use tp_core::state::RunRegistry;
use tp_protocol::stage_models::RunState;
use tp_protocol::travel_models::{Capability, HealthStatus};

const BROKEN_WEATHER: &str = r#"
name: live-weather
capability: weather
kind: http
base-url: http://127.0.0.1:9/v1
api-key-env: TP_TEST_WEATHER_KEY_THAT_IS_NEVER_SET
"#;

async fn scaffold() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    generate_trip_planner_structure(InitOptions {
        target_dir: dir.path().to_path_buf(),
        force: false,
        minimal: false,
    })
    .await
    .unwrap();
    dir
}

#[tokio::test]
async fn test_orlando_plan_from_scaffolded_project() {
    let dir = scaffold().await;
    let config = load_config(dir.path()).await.unwrap();
    let providers = Arc::new(config.build_providers());

    let response = plan_trip(orlando_request(), providers, &config.global, None).await;

    assert!(response.success, "plan failed: {:?}", response.error);
    assert!(response.error.is_none());
    let data = response.data.unwrap();
    assert_eq!(data.summary.destination, "Orlando");
    assert_eq!(data.summary.duration, 7);
    assert!(data.summary.flights > 0);
    assert!(data.summary.accommodations > 0);

    let planner = data.planner.unwrap();
    assert!(!planner.activities.is_empty());
    assert!(planner.weather.is_some());

    let scheduler = data.scheduler.unwrap();
    assert_eq!(scheduler.days.len(), 7);
    assert_eq!(data.summary.activities.len(), scheduler.scheduled_count());

    let ui = data.ui.unwrap();
    assert_contains_ci(&ui.title, "orlando");
    assert_eq!(ui.days.len(), 7);
    assert_eq!(ui.export.prepared_for, "family-42");
}

#[tokio::test]
async fn test_health_isolates_misconfigured_provider() {
    let dir = scaffold().await;
    std::fs::write(
        dir.path().join(CONFIG_DIR).join("providers/weather.yaml"),
        BROKEN_WEATHER,
    )
    .unwrap();

    let config = load_config(dir.path()).await.unwrap();
    let report = config.build_providers().health_check().await;

    assert_eq!(report.status, HealthStatus::Unhealthy);
    assert_eq!(report.providers.len(), Capability::ALL.len());

    let weather = &report.providers[&Capability::Weather];
    assert_eq!(weather.adapter, "live-weather");
    assert_eq!(weather.status, HealthStatus::Unhealthy);
    assert_contains_ci(weather.error.as_deref().unwrap(), "TP_TEST_WEATHER_KEY_THAT_IS_NEVER_SET");

    for capability in [
        Capability::Attractions,
        Capability::Places,
        Capability::Flights,
        Capability::Accommodations,
    ] {
        assert_eq!(report.providers[&capability].status, HealthStatus::Healthy);
    }
}

#[tokio::test]
async fn test_broken_weather_does_not_fail_the_plan() {
    let dir = scaffold().await;
    std::fs::write(
        dir.path().join(CONFIG_DIR).join("providers/weather.yaml"),
        BROKEN_WEATHER,
    )
    .unwrap();

    let config = load_config(dir.path()).await.unwrap();
    let providers = Arc::new(config.build_providers());
    let response = plan_trip(orlando_request(), providers, &config.global, None).await;

    assert!(response.success, "plan failed: {:?}", response.error);
    assert!(response.data.unwrap().planner.unwrap().weather.is_none());
}

#[tokio::test]
async fn test_minimal_project_falls_back_to_mocks() {
    let dir = tempdir().unwrap();
    generate_trip_planner_structure(InitOptions {
        target_dir: dir.path().to_path_buf(),
        force: false,
        minimal: true,
    })
    .await
    .unwrap();

    let config = load_config(dir.path()).await.unwrap();
    assert!(config.providers.is_empty());

    let report = config.build_providers().health_check().await;
    assert_eq!(report.status, HealthStatus::Healthy);
    assert_eq!(report.providers.len(), Capability::ALL.len());
}

#[tokio::test]
async fn test_registry_runs_concurrent_plans() {
    let dir = scaffold().await;
    let config = load_config(dir.path()).await.unwrap();
    let registry = RunRegistry::new(Arc::new(config.build_providers()), config.global.clone());

    let orlando = into_context(parse_request(ORLANDO_REQUEST).unwrap()).unwrap();
    let mut denver = orlando.clone();
    denver.user_id = "family-7".to_string();
    denver.preferences.destination = Some("Denver".to_string());

    let first = registry.start_run(orlando).await;
    let second = registry.start_run(denver).await;
    assert_ne!(first, second);

    let first_result = registry.wait(first).await.unwrap();
    let second_result = registry.wait(second).await.unwrap();
    assert_eq!(first_result.summary().unwrap().destination, "Orlando");
    assert_eq!(second_result.summary().unwrap().destination, "Denver");

    let runs = registry.list_runs().await;
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|r| r.state == RunState::Succeeded));
}
