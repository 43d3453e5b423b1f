//! Test fixtures for requests, planning contexts and provider managers.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tp_core::providers::{ApiServiceManager, MockProvider, ProviderAdapter};
use tp_protocol::ipc::Event;
use tp_protocol::planning_models::{FamilyProfile, PlanRequest, PlanningContext, TripPreferences};
use tp_protocol::travel_models::Capability;

/// JSON body of the reference request: a family of four flying to Orlando
/// for a week.
pub const ORLANDO_REQUEST: &str = r#"{
    "userId": "family-42",
    "familyProfile": {
        "adults": 2,
        "children": 2,
        "ages": [8, 5],
        "interests": ["theme parks", "beaches"],
        "dietaryRestrictions": ["vegetarian"]
    },
    "destination": "Orlando",
    "origin": "Chicago",
    "budget": 5000,
    "startDate": "2024-06-15",
    "endDate": "2024-06-22",
    "tripType": "vacation",
    "accommodationType": "hotel",
    "transportation": "flight"
}"#;

pub fn orlando_request() -> PlanRequest {
    serde_json::from_str(ORLANDO_REQUEST).expect("reference request should parse")
}

pub fn orlando_context() -> Arc<PlanningContext> {
    Arc::new(PlanningContext {
        user_id: "family-42".to_string(),
        family: FamilyProfile {
            adults: 2,
            children: 2,
            ages: vec![8, 5],
            interests: vec!["theme parks".to_string(), "beaches".to_string()],
            dietary_restrictions: vec!["vegetarian".to_string()],
        },
        preferences: TripPreferences {
            destination: Some("Orlando".to_string()),
            origin: Some("Chicago".to_string()),
            budget: 5000.0,
            start_date: "2024-06-15".parse().expect("valid date"),
            end_date: "2024-06-22".parse().expect("valid date"),
            trip_type: "vacation".to_string(),
            accommodation_type: "hotel".to_string(),
            transportation: "flight".to_string(),
        },
    })
}

/// All-mock manager with one capability replaced.
pub fn mock_providers_with(adapter: Arc<dyn ProviderAdapter>) -> Arc<ApiServiceManager> {
    let builder = Capability::ALL
        .into_iter()
        .fold(ApiServiceManager::builder(), |builder, capability| {
            builder.with_adapter(Arc::new(MockProvider::success(capability)))
        });
    Arc::new(builder.with_adapter(adapter).build())
}

/// Channel whose events are drained into a Vec by a background task.
///
/// The task finishes once every sender has been dropped.
pub fn event_collector() -> (mpsc::Sender<Event>, JoinHandle<Vec<Event>>) {
    let (tx, mut rx) = mpsc::channel(32);
    let handle = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    });
    (tx, handle)
}
