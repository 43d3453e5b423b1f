//! Planning request and context models.
//!
//! The inbound request arrives as camelCase JSON from the web layer. Once
//! validated it becomes a [`PlanningContext`], which stays read-only for the
//! whole orchestration run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Who is travelling.
///
/// `ages` lists the children's ages; adults are only counted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, TS)]
#[serde(rename_all = "camelCase")]
pub struct FamilyProfile {
    pub adults: u32,

    #[serde(default)]
    pub children: u32,

    #[serde(default)]
    pub ages: Vec<u32>,

    /// Free-form interests such as "theme parks" or "museums".
    #[serde(default)]
    pub interests: Vec<String>,

    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl FamilyProfile {
    /// Total number of travellers in the party.
    pub fn travelers(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }

    /// Age of the youngest child, if any ages were reported.
    pub fn youngest_age(&self) -> Option<u32> {
        self.ages.iter().copied().min()
    }
}

/// Where, when and how the family wants to travel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct TripPreferences {
    /// Requested destination. When absent the planner suggests one.
    pub destination: Option<String>,

    /// Departure city for flight search.
    pub origin: Option<String>,

    /// Total budget for travel and lodging. Zero means "no limit".
    pub budget: f64,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    pub trip_type: String,

    pub accommodation_type: String,

    pub transportation: String,
}

impl TripPreferences {
    /// Number of nights between start and end date.
    pub fn nights(&self) -> u32 {
        u32::try_from((self.end_date - self.start_date).num_days()).unwrap_or(0)
    }

    /// Whether the family travels by road rather than by air.
    pub fn travels_by_road(&self) -> bool {
        matches!(
            self.transportation.trim().to_lowercase().as_str(),
            "car" | "drive" | "driving" | "road" | "rv"
        )
    }
}

/// Immutable input bundle for one orchestration run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct PlanningContext {
    /// Opaque identifier handed over by the identity provider.
    pub user_id: String,

    pub family: FamilyProfile,

    pub preferences: TripPreferences,
}

impl PlanningContext {
    pub fn travelers(&self) -> u32 {
        self.family.travelers()
    }

    pub fn nights(&self) -> u32 {
        self.preferences.nights()
    }
}

/// The planning request body as posted by the frontend.
///
/// ```json
/// {
///   "familyProfile": { "adults": 2, "children": 2, "ages": [8, 5], "interests": ["theme parks"] },
///   "destination": "Orlando",
///   "budget": 5000,
///   "startDate": "2024-06-15",
///   "endDate": "2024-06-22"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(default)]
    pub user_id: Option<String>,

    pub family_profile: FamilyProfile,

    #[serde(default)]
    pub destination: Option<String>,

    #[serde(default)]
    pub origin: Option<String>,

    #[serde(default)]
    pub budget: f64,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[serde(default)]
    pub trip_type: String,

    #[serde(default)]
    pub accommodation_type: String,

    #[serde(default)]
    pub transportation: String,
}
