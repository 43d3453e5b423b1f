//! Trip summary derivation.

use std::collections::BTreeMap;
use tp_protocol::stage_models::StageKind;
use tp_protocol::trip_models::{
    BookingOutput, PlannerOutput, SchedulerOutput, StageOutput, SummaryActivity, TripSummary,
};

/// Build the summary from whichever stage outputs exist.
///
/// Destination comes from the planner, cost and candidate counts from
/// booking, duration and activities from the scheduler. Anything missing
/// stays zero or empty.
pub fn build_summary(
    planner: Option<&PlannerOutput>,
    booking: Option<&BookingOutput>,
    scheduler: Option<&SchedulerOutput>,
) -> TripSummary {
    let activities = scheduler
        .map(|s| {
            s.days
                .iter()
                .flat_map(|day| {
                    day.activities.iter().map(move |scheduled| SummaryActivity {
                        name: scheduled.activity.name.clone(),
                        category: scheduled.activity.category.clone(),
                        date: day.date,
                        slot: scheduled.slot,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    TripSummary {
        destination: planner.map(|p| p.destination.clone()).unwrap_or_default(),
        total_cost: booking.map_or(0.0, |b| b.total_cost),
        duration: scheduler
            .map(|s| u32::try_from(s.days.len()).unwrap_or(u32::MAX))
            .unwrap_or_default(),
        activities,
        accommodations: booking.map_or(0, |b| b.accommodations.len()),
        flights: booking.map_or(0, |b| b.flights.len()),
    }
}

/// [`build_summary`] over a map of recorded stage outputs.
pub fn summarize_outputs(outputs: &BTreeMap<StageKind, StageOutput>) -> TripSummary {
    let planner = match outputs.get(&StageKind::Planner) {
        Some(StageOutput::Planner(o)) => Some(o),
        _ => None,
    };
    let booking = match outputs.get(&StageKind::Booking) {
        Some(StageOutput::Booking(o)) => Some(o),
        _ => None,
    };
    let scheduler = match outputs.get(&StageKind::Scheduler) {
        Some(StageOutput::Scheduler(o)) => Some(o),
        _ => None,
    };
    build_summary(planner, booking, scheduler)
}
