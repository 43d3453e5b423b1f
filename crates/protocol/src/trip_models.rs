//! Stage outputs, the trip summary and the orchestration result.

use crate::stage_models::StageKind;
use crate::travel_models::{Accommodation, Flight, Place, WeatherReport};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Where an activity candidate came from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySource {
    Attraction,
    Place,
}

/// A candidate activity produced by the planner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub category: String,
    pub location: String,
    pub source: ActivitySource,
    pub rating: f64,
    pub cost_adult: f64,
    pub cost_child: f64,
    pub duration_hours: f64,
    /// Number of family interests this activity matches.
    pub interest_score: u32,
}

impl Activity {
    /// Cost of this activity for the whole party.
    pub fn party_cost(&self, adults: u32, children: u32) -> f64 {
        self.cost_adult * f64::from(adults) + self.cost_child * f64::from(children)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSuggestion {
    pub name: String,
    pub score: u32,
    /// Interests that led to the suggestion.
    pub reasons: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct PlannerOutput {
    pub destination: String,
    pub suggestions: Vec<DestinationSuggestion>,
    /// Ranked activity candidates, best first.
    pub activities: Vec<Activity>,
    pub dining: Vec<Place>,
    #[serde(default)]
    pub weather: Option<WeatherReport>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct BookingOutput {
    /// Flight candidates within budget, cheapest first.
    pub flights: Vec<Flight>,
    /// Accommodation candidates within budget, cheapest first.
    pub accommodations: Vec<Accommodation>,
    pub selected_flight: Option<Flight>,
    pub selected_accommodation: Option<Accommodation>,
    pub nights: u32,
    pub travelers: u32,
    pub flight_cost: f64,
    pub lodging_cost: f64,
    /// Travel plus lodging for the whole party.
    pub total_cost: f64,
    pub within_budget: bool,
}

/// Part of the day an activity is slotted into.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub fn for_position(position: usize) -> Self {
        match position {
            0 => Self::Morning,
            1 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledActivity {
    pub activity: Activity,
    pub slot: TimeSlot,
    pub party_cost: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub date: NaiveDate,
    /// 1-based day counter within the itinerary.
    pub day_number: u32,
    pub activities: Vec<ScheduledActivity>,
    pub estimated_cost: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerOutput {
    pub days: Vec<DayPlan>,
    /// Candidates that did not fit into the itinerary.
    pub unscheduled: Vec<Activity>,
}

impl SchedulerOutput {
    pub fn scheduled_count(&self) -> usize {
        self.days.iter().map(|d| d.activities.len()).sum()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct SummaryActivity {
    pub name: String,
    pub category: String,
    pub date: NaiveDate,
    pub slot: TimeSlot,
}

/// Headline figures of a finished plan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, TS)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub destination: String,
    pub total_cost: f64,
    /// Length of the itinerary in days.
    pub duration: u32,
    pub activities: Vec<SummaryActivity>,
    /// Number of accommodation candidates.
    pub accommodations: usize,
    /// Number of flight candidates.
    pub flights: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, TS)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub flights: f64,
    pub lodging: f64,
    pub activities: f64,
    pub total: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct DisplayDay {
    pub date: NaiveDate,
    pub title: String,
    pub items: Vec<String>,
    pub estimated_cost: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ExportSection {
    pub heading: String,
    pub lines: Vec<String>,
}

/// Printable/exportable rendition of the plan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub title: String,
    pub prepared_for: String,
    pub sections: Vec<ExportSection>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct UiOutput {
    pub title: String,
    pub summary: TripSummary,
    pub cost_breakdown: CostBreakdown,
    pub days: Vec<DisplayDay>,
    pub export: ExportDocument,
}

/// Output of a single stage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(tag = "stage", content = "output", rename_all = "lowercase")]
pub enum StageOutput {
    Planner(PlannerOutput),
    Booking(BookingOutput),
    Scheduler(SchedulerOutput),
    Ui(UiOutput),
}

impl StageOutput {
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Planner(_) => StageKind::Planner,
            Self::Booking(_) => StageKind::Booking,
            Self::Scheduler(_) => StageKind::Scheduler,
            Self::Ui(_) => StageKind::Ui,
        }
    }
}

/// Final outcome of one orchestration run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OrchestrationResult {
    Success {
        stages: BTreeMap<StageKind, StageOutput>,
        summary: TripSummary,
    },
    Failure {
        error: String,
        /// Stage whose failure ended the run, if a stage was at fault.
        #[serde(default)]
        stage: Option<StageKind>,
    },
}

impl OrchestrationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    pub fn summary(&self) -> Option<&TripSummary> {
        match self {
            Self::Success { summary, .. } => Some(summary),
            Self::Failure { .. } => None,
        }
    }

    pub fn stage_output(&self, kind: StageKind) -> Option<&StageOutput> {
        match self {
            Self::Success { stages, .. } => stages.get(&kind),
            Self::Failure { .. } => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponseData {
    pub summary: TripSummary,
    pub planner: Option<PlannerOutput>,
    pub booking: Option<BookingOutput>,
    pub scheduler: Option<SchedulerOutput>,
    pub ui: Option<UiOutput>,
}

/// Response body returned to the frontend:
/// `{ success, data?: { summary, planner, booking, scheduler, ui }, error? }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PlanResponseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlanResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl From<OrchestrationResult> for PlanResponse {
    fn from(result: OrchestrationResult) -> Self {
        match result {
            OrchestrationResult::Failure { error, .. } => Self::failure(error),
            OrchestrationResult::Success { stages, summary } => {
                let mut data = PlanResponseData {
                    summary,
                    planner: None,
                    booking: None,
                    scheduler: None,
                    ui: None,
                };
                for output in stages.into_values() {
                    match output {
                        StageOutput::Planner(o) => data.planner = Some(o),
                        StageOutput::Booking(o) => data.booking = Some(o),
                        StageOutput::Scheduler(o) => data.scheduler = Some(o),
                        StageOutput::Ui(o) => data.ui = Some(o),
                    }
                }
                Self {
                    success: true,
                    data: Some(data),
                    error: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_response() {
        let result = OrchestrationResult::Failure {
            error: "rate limited".to_string(),
            stage: Some(StageKind::Booking),
        };
        assert!(!result.is_success());
        assert_eq!(result.error(), Some("rate limited"));

        let response = PlanResponse::from(result);
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some("rate limited"));
    }

    #[test]
    fn test_success_response_splits_stage_outputs() {
        let mut stages = BTreeMap::new();
        stages.insert(
            StageKind::Scheduler,
            StageOutput::Scheduler(SchedulerOutput {
                days: vec![],
                unscheduled: vec![],
            }),
        );
        let result = OrchestrationResult::Success {
            stages,
            summary: TripSummary {
                destination: "Orlando".to_string(),
                ..TripSummary::default()
            },
        };

        let response = PlanResponse::from(result);
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data.summary.destination, "Orlando");
        assert!(data.scheduler.is_some());
        assert!(data.planner.is_none());
    }

    #[test]
    fn test_activity_party_cost() {
        let activity = Activity {
            id: "a1".to_string(),
            name: "Splash Park".to_string(),
            category: "water parks".to_string(),
            location: "Orlando".to_string(),
            source: ActivitySource::Attraction,
            rating: 4.5,
            cost_adult: 50.0,
            cost_child: 25.0,
            duration_hours: 3.0,
            interest_score: 1,
        };
        assert_eq!(activity.party_cost(2, 2), 150.0);
    }

    #[test]
    fn test_time_slot_for_position() {
        assert_eq!(TimeSlot::for_position(0), TimeSlot::Morning);
        assert_eq!(TimeSlot::for_position(1), TimeSlot::Afternoon);
        assert_eq!(TimeSlot::for_position(5), TimeSlot::Evening);
    }
}
