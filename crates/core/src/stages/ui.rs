//! UI stage: reshapes earlier outputs into a display-ready plan.
//!
//! Makes no provider calls.

use crate::stages::base::{StageAgent, StageContext, StageError};
use crate::stages::summary::build_summary;
use crate::state::tracker::StageTracker;
use async_trait::async_trait;
use tp_protocol::planning_models::PlanningContext;
use tp_protocol::stage_models::StageKind;
use tp_protocol::trip_models::{
    BookingOutput, CostBreakdown, DayPlan, DisplayDay, ExportDocument, ExportSection,
    PlannerOutput, SchedulerOutput, StageOutput, UiOutput,
};

pub struct UiStage {
    tracker: StageTracker,
}

impl UiStage {
    pub fn new() -> Self {
        Self {
            tracker: StageTracker::new(StageKind::Ui),
        }
    }
}

impl Default for UiStage {
    fn default() -> Self {
        Self::new()
    }
}

fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

fn display_day(day: &DayPlan) -> DisplayDay {
    DisplayDay {
        date: day.date,
        title: format!("Day {}: {}", day.day_number, day.date.format("%A, %B %-d")),
        items: day
            .activities
            .iter()
            .map(|a| format!("{}: {} ({})", a.slot.label(), a.activity.name, money(a.party_cost)))
            .collect(),
        estimated_cost: day.estimated_cost,
    }
}

fn export_document(
    title: &str,
    planning: &PlanningContext,
    planner: &PlannerOutput,
    booking: &BookingOutput,
    scheduler: &SchedulerOutput,
    costs: &CostBreakdown,
) -> ExportDocument {
    let preferences = &planning.preferences;
    let mut sections = vec![ExportSection {
        heading: "Overview".to_string(),
        lines: vec![
            format!("Destination: {}", planner.destination),
            format!("Dates: {} to {}", preferences.start_date, preferences.end_date),
            format!(
                "Travelers: {} adults, {} children",
                planning.family.adults, planning.family.children
            ),
            format!("Estimated total: {}", money(costs.total)),
        ],
    }];

    let mut travel = Vec::new();
    if let Some(flight) = &booking.selected_flight {
        travel.push(format!(
            "Flight: {} {} from {} departing {}",
            flight.airline,
            flight.flight_number,
            flight.origin,
            flight.departure.format("%Y-%m-%d %H:%M")
        ));
    }
    if let Some(stay) = &booking.selected_accommodation {
        travel.push(format!(
            "Stay: {} ({}), {} nights at {} per night",
            stay.name,
            stay.kind,
            booking.nights,
            money(stay.price_per_night)
        ));
    }
    if !travel.is_empty() {
        sections.push(ExportSection {
            heading: "Travel".to_string(),
            lines: travel,
        });
    }

    sections.push(ExportSection {
        heading: "Itinerary".to_string(),
        lines: scheduler
            .days
            .iter()
            .flat_map(|day| {
                let shown = display_day(day);
                std::iter::once(shown.title)
                    .chain(shown.items.into_iter().map(|i| format!("  {i}")))
            })
            .collect(),
    });

    if !planner.dining.is_empty() {
        sections.push(ExportSection {
            heading: "Dining".to_string(),
            lines: planner
                .dining
                .iter()
                .map(|p| format!("{} ({})", p.name, p.address))
                .collect(),
        });
    }

    if let Some(weather) = &planner.weather {
        sections.push(ExportSection {
            heading: "Weather".to_string(),
            lines: vec![format!(
                "{}, {:.0}°C, humidity {}%",
                weather.condition, weather.temperature_c, weather.humidity
            )],
        });
    }

    if !scheduler.unscheduled.is_empty() {
        sections.push(ExportSection {
            heading: "If there is time".to_string(),
            lines: scheduler.unscheduled.iter().map(|a| a.name.clone()).collect(),
        });
    }

    ExportDocument {
        title: title.to_string(),
        prepared_for: planning.user_id.clone(),
        sections,
    }
}

#[async_trait]
impl StageAgent for UiStage {
    fn kind(&self) -> StageKind {
        StageKind::Ui
    }

    fn tracker(&self) -> &StageTracker {
        &self.tracker
    }

    async fn run(&self, context: &StageContext) -> Result<StageOutput, StageError> {
        let planner = context.planner()?;
        let booking = context.booking()?;
        let scheduler = context.scheduler()?;
        self.tracker.advance(25);

        let summary = build_summary(Some(planner), Some(booking), Some(scheduler));
        let activities: f64 = scheduler.days.iter().map(|d| d.estimated_cost).sum();
        let cost_breakdown = CostBreakdown {
            flights: booking.flight_cost,
            lodging: booking.lodging_cost,
            activities,
            total: booking.flight_cost + booking.lodging_cost + activities,
        };
        let days: Vec<DisplayDay> = scheduler.days.iter().map(display_day).collect();
        self.tracker.advance(60);

        let title = format!("Family trip to {}", planner.destination);
        let export = export_document(
            &title,
            context.planning(),
            planner,
            booking,
            scheduler,
            &cost_breakdown,
        );

        Ok(StageOutput::Ui(UiOutput {
            title,
            summary,
            cost_breakdown,
            days,
            export,
        }))
    }
}
