//! Inbound request parsing and validation.

use thiserror::Error;
use tp_protocol::planning_models::{PlanRequest, PlanningContext, TripPreferences};

/// User id assigned when the request carries none.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Largest party (adults plus children) a single plan is built for.
pub const MAX_PARTY_SIZE: u32 = 30;

/// Longest trip accepted, in nights.
pub const MAX_TRIP_NIGHTS: i64 = 60;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Invalid request body: {0}")]
    Parse(String),

    #[error("End date {end} is before start date {start}")]
    DateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("At least one adult must travel")]
    NoAdults,

    #[error("Budget must not be negative (got {0})")]
    NegativeBudget(f64),

    #[error("Family lists {children} children but {ages} ages")]
    AgeMismatch { children: u32, ages: usize },

    #[error(
        "Party of {adults} adults and {children} children exceeds {max} travellers",
        max = MAX_PARTY_SIZE
    )]
    PartyTooLarge { adults: u32, children: u32 },

    #[error("Trip of {nights} nights exceeds the {max}-night limit", max = MAX_TRIP_NIGHTS)]
    TripTooLong { nights: i64 },
}

/// Parse a JSON request body.
///
/// # Errors
///
/// Returns `RequestError::Parse` for malformed JSON, missing required fields
/// or dates that are not ISO `YYYY-MM-DD`.
pub fn parse_request(body: &str) -> Result<PlanRequest, RequestError> {
    serde_json::from_str(body).map_err(|e| RequestError::Parse(e.to_string()))
}

/// Check a request without consuming it.
///
/// # Errors
///
/// - `RequestError::DateRange` if the end date precedes the start date
/// - `RequestError::TripTooLong` beyond `MAX_TRIP_NIGHTS` nights
/// - `RequestError::NoAdults` if no adult travels
/// - `RequestError::PartyTooLarge` beyond `MAX_PARTY_SIZE` travellers
/// - `RequestError::NegativeBudget` for a negative or NaN budget
/// - `RequestError::AgeMismatch` if ages are given but their count differs
///   from `children`
pub fn validate_request(request: &PlanRequest) -> Result<(), RequestError> {
    if request.end_date < request.start_date {
        return Err(RequestError::DateRange {
            start: request.start_date,
            end: request.end_date,
        });
    }

    let nights = (request.end_date - request.start_date).num_days();
    if nights > MAX_TRIP_NIGHTS {
        return Err(RequestError::TripTooLong { nights });
    }

    let family = &request.family_profile;
    if family.adults == 0 {
        return Err(RequestError::NoAdults);
    }

    let party = family.adults.checked_add(family.children);
    if !party.is_some_and(|size| size <= MAX_PARTY_SIZE) {
        return Err(RequestError::PartyTooLarge {
            adults: family.adults,
            children: family.children,
        });
    }

    if request.budget < 0.0 || request.budget.is_nan() {
        return Err(RequestError::NegativeBudget(request.budget));
    }

    if !family.ages.is_empty() && usize::try_from(family.children).ok() != Some(family.ages.len()) {
        return Err(RequestError::AgeMismatch {
            children: family.children,
            ages: family.ages.len(),
        });
    }

    Ok(())
}

/// Validate a request and turn it into the immutable planning context.
pub fn into_context(request: PlanRequest) -> Result<PlanningContext, RequestError> {
    validate_request(&request)?;

    let user_id = request
        .user_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| ANONYMOUS_USER.to_string());

    Ok(PlanningContext {
        user_id,
        family: request.family_profile,
        preferences: TripPreferences {
            destination: request.destination,
            origin: request.origin,
            budget: request.budget,
            start_date: request.start_date,
            end_date: request.end_date,
            trip_type: request.trip_type,
            accommodation_type: request.accommodation_type,
            transportation: request.transportation,
        },
    })
}
