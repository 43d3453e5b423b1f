use tp_protocol::*;

#[test]
fn test_plan_request_deserialization_from_json() {
    let json = r#"{
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

    let request: PlanRequest =
        serde_json::from_str(json).expect("Failed to deserialize PlanRequest");

    assert_eq!(request.family_profile.adults, 2);
    assert_eq!(request.family_profile.ages, vec![8, 5]);
    assert!(request.family_profile.dietary_restrictions.is_empty());
    assert_eq!(request.destination.as_deref(), Some("Orlando"));
    assert_eq!(request.budget, 5000.0);
    assert_eq!(request.start_date.to_string(), "2024-06-15");
    assert!(request.user_id.is_none());
    assert!(request.origin.is_none());
}

#[test]
fn test_plan_request_rejects_bad_date() {
    let json = r#"{
        "familyProfile": { "adults": 2 },
        "startDate": "June 15th",
        "endDate": "2024-06-22"
    }"#;

    let result: Result<PlanRequest, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[test]
fn test_stage_state_serialization() {
    let json = serde_json::to_value(StageState::Running).expect("Failed to serialize StageState");
    assert_eq!(json, "running");

    let deserialized: StageState =
        serde_json::from_value(json).expect("Failed to deserialize StageState");
    assert_eq!(deserialized, StageState::Running);
}

#[test]
fn test_stage_status_omits_missing_error() {
    let status = StageStatus {
        state: StageState::Completed,
        progress: 100,
        error: None,
    };
    let json = serde_json::to_value(&status).expect("Failed to serialize StageStatus");
    assert_eq!(json["state"], "completed");
    assert_eq!(json["progress"], 100);
    assert!(json.get("error").is_none());
}

#[test]
fn test_provider_result_envelope_shape() {
    let result: ProviderResult<Vec<Attraction>> = ProviderResult::err("rate limited");
    let json = serde_json::to_value(&result).expect("Failed to serialize ProviderResult");

    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "rate limited");
    assert!(json["data"].as_array().map(Vec::is_empty).unwrap_or(false));
}

#[test]
fn test_provider_query_tagging() {
    let query = ProviderQuery::Attractions(AttractionQuery {
        location: "Orlando".to_string(),
        limit: 5,
    });
    let json = serde_json::to_value(&query).expect("Failed to serialize ProviderQuery");
    assert_eq!(json["capability"], "attractions");
    assert_eq!(json["query"]["location"], "Orlando");
}

#[test]
fn test_event_enum_serialization() {
    use uuid::Uuid;

    let event = Event::RunStarted {
        run_id: Uuid::new_v4(),
        user_id: "user-1".to_string(),
        destination: Some("Orlando".to_string()),
    };

    let json = serde_json::to_value(&event).expect("Failed to serialize Event");
    assert_eq!(json["type"], "runStarted");
    assert!(json["payload"].is_object());

    let update = Event::StageStatusUpdate {
        run_id: Uuid::new_v4(),
        stage: StageKind::Booking,
        state: StageState::Failed,
        progress: 40,
    };
    let json = serde_json::to_value(&update).expect("Failed to serialize Event");
    assert_eq!(json["type"], "stageStatusUpdate");
    assert_eq!(json["payload"]["stage"], "booking");
}

#[test]
fn test_orchestration_failure_serialization() {
    let result = OrchestrationResult::Failure {
        error: "rate limited".to_string(),
        stage: Some(StageKind::Booking),
    };
    let json = serde_json::to_value(&result).expect("Failed to serialize OrchestrationResult");
    assert_eq!(json["status"], "failure");
    assert_eq!(json["error"], "rate limited");
    assert_eq!(json["stage"], "booking");
}

#[test]
fn test_global_config_from_partial_toml() {
    let config: GlobalConfig = toml::from_str(
        r#"
[scheduler]
max_activities_per_day = 2
"#,
    )
    .expect("Failed to parse GlobalConfig");

    assert_eq!(config.scheduler.max_activities_per_day, 2);
    assert_eq!(config.engine.stage_timeout_secs, 30);
    assert_eq!(config.planner.attraction_limit, 20);
    assert_eq!(config.booking.default_origin, "New York");
}

#[test]
fn test_provider_definition_from_yaml() {
    let yaml = r#"
name: open-weather
capability: weather
kind: http
base-url: https://weather.example.com/v1
api-key-env: WEATHER_API_KEY
"#;

    let definition: ProviderDefinition =
        serde_yaml::from_str(yaml).expect("Failed to parse ProviderDefinition");
    assert_eq!(definition.capability, Capability::Weather);
    assert_eq!(definition.kind, ProviderKind::Http);
    assert_eq!(definition.base_url.as_deref(), Some("https://weather.example.com/v1"));
    assert_eq!(definition.api_key_env.as_deref(), Some("WEATHER_API_KEY"));
    assert_eq!(definition.timeout_secs, 10);
    assert!(definition.latency_ms.is_none());
}

#[test]
fn test_provider_definition_defaults_to_mock() {
    let yaml = "name: mock-places\ncapability: places\n";
    let definition: ProviderDefinition =
        serde_yaml::from_str(yaml).expect("Failed to parse ProviderDefinition");
    assert_eq!(definition.kind, ProviderKind::Mock);
}
