//! Custom assertion helpers for orchestration events.

use tp_protocol::ipc::Event;
use tp_protocol::stage_models::{StageKind, StageState};

/// Assert that events open with RunStarted and close with a terminal event.
pub fn assert_event_sequence(events: &[Event]) {
    if events.is_empty() {
        panic!("Event sequence is empty");
    }

    assert!(
        matches!(events[0], Event::RunStarted { .. }),
        "First event should be RunStarted, got: {:?}",
        events[0]
    );

    let last = events.last().unwrap();
    assert!(
        matches!(last, Event::RunCompleted { .. } | Event::RunFailed { .. }),
        "Last event should be RunCompleted or RunFailed, got: {last:?}"
    );
}

/// Stages in the order their first status update was emitted.
pub fn stages_in_event_order(events: &[Event]) -> Vec<StageKind> {
    let mut order = Vec::new();
    for event in events {
        if let Event::StageStatusUpdate { stage, .. } = event {
            if !order.contains(stage) {
                order.push(*stage);
            }
        }
    }
    order
}

/// Every (state, progress) update emitted for one stage.
pub fn updates_for(events: &[Event], kind: StageKind) -> Vec<(StageState, u8)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::StageStatusUpdate {
                stage,
                state,
                progress,
                ..
            } if *stage == kind => Some((*state, *progress)),
            _ => None,
        })
        .collect()
}

/// Assert that a string contains a substring (case-insensitive).
pub fn assert_contains_ci(haystack: &str, needle: &str) {
    let haystack_lower = haystack.to_lowercase();
    let needle_lower = needle.to_lowercase();
    assert!(
        haystack_lower.contains(&needle_lower),
        "Expected '{haystack}' to contain '{needle}' (case-insensitive)"
    );
}
