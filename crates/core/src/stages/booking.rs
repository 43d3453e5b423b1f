//! Booking stage: flight and accommodation selection within budget.

use crate::providers::ApiServiceManager;
use crate::stages::base::{StageAgent, StageContext, StageError};
use crate::state::tracker::StageTracker;
use async_trait::async_trait;
use std::sync::Arc;
use tp_protocol::config_models::BookingConfig;
use tp_protocol::stage_models::StageKind;
use tp_protocol::travel_models::{Accommodation, AccommodationQuery, Flight, FlightQuery};
use tp_protocol::trip_models::{BookingOutput, StageOutput};

pub struct BookingStage {
    providers: Arc<ApiServiceManager>,
    config: BookingConfig,
    tracker: StageTracker,
}

impl BookingStage {
    pub fn new(providers: Arc<ApiServiceManager>, config: BookingConfig) -> Self {
        Self {
            providers,
            config,
            tracker: StageTracker::new(StageKind::Booking),
        }
    }
}

/// Budget filter. A budget of zero or less means "no limit".
#[derive(Debug, Clone, Copy)]
struct Budget(Option<f64>);

impl Budget {
    fn new(amount: f64) -> Self {
        Self((amount > 0.0).then_some(amount))
    }

    fn allows(&self, cost: f64) -> bool {
        self.0.map_or(true, |limit| cost <= limit)
    }
}

fn select_flights(flights: Vec<Flight>, travelers: u32, budget: Budget) -> Vec<Flight> {
    let party = f64::from(travelers);
    let mut flights: Vec<Flight> = flights
        .into_iter()
        .filter(|f| budget.allows(f.price_per_person * party))
        .collect();
    flights.sort_by(|a, b| a.price_per_person.total_cmp(&b.price_per_person));
    flights
}

fn select_accommodations(
    stays: Vec<Accommodation>,
    travelers: u32,
    nights: u32,
    preferred_kind: &str,
    budget: Budget,
) -> Vec<Accommodation> {
    let mut stays: Vec<Accommodation> = stays
        .into_iter()
        .filter(|a| a.max_guests >= travelers)
        .filter(|a| budget.allows(a.price_per_night * f64::from(nights)))
        .collect();

    let preferred_kind = preferred_kind.trim();
    if !preferred_kind.is_empty()
        && stays
            .iter()
            .any(|a| a.kind.eq_ignore_ascii_case(preferred_kind))
    {
        stays.retain(|a| a.kind.eq_ignore_ascii_case(preferred_kind));
    }

    stays.sort_by(|a, b| a.price_per_night.total_cmp(&b.price_per_night));
    stays
}

#[async_trait]
impl StageAgent for BookingStage {
    fn kind(&self) -> StageKind {
        StageKind::Booking
    }

    fn tracker(&self) -> &StageTracker {
        &self.tracker
    }

    async fn run(&self, context: &StageContext) -> Result<StageOutput, StageError> {
        let planner = context.planner()?;
        let planning = context.planning();
        let family = &planning.family;
        let preferences = &planning.preferences;

        let travelers = planning.travelers();
        let nights = planning.nights().max(1);
        let budget = Budget::new(preferences.budget);
        self.tracker.advance(10);

        let flights = if preferences.travels_by_road() {
            tracing::info!(
                transportation = %preferences.transportation,
                "travelling by road, skipping flight search"
            );
            Vec::new()
        } else {
            let origin = preferences
                .origin
                .as_deref()
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .unwrap_or(&self.config.default_origin)
                .to_string();
            self.providers
                .search_flights(FlightQuery {
                    origin,
                    destination: planner.destination.clone(),
                    departure_date: preferences.start_date,
                    return_date: Some(preferences.end_date),
                    adults: family.adults,
                    children: family.children,
                })
                .await
                .into_result()
                .map_err(StageError::Provider)?
        };
        self.tracker.advance(45);

        let stays = self
            .providers
            .search_accommodations(AccommodationQuery {
                location: planner.destination.clone(),
                check_in: preferences.start_date,
                check_out: preferences.end_date,
                adults: family.adults,
                children: family.children,
            })
            .await
            .into_result()
            .map_err(StageError::Provider)?;
        self.tracker.advance(80);

        let flights = select_flights(flights, travelers, budget);
        let accommodations = select_accommodations(
            stays,
            travelers,
            nights,
            &preferences.accommodation_type,
            budget,
        );

        let selected_flight = flights.first().cloned();
        let selected_accommodation = accommodations.first().cloned();
        let flight_cost = selected_flight
            .as_ref()
            .map_or(0.0, |f| f.price_per_person * f64::from(travelers));
        let lodging_cost = selected_accommodation
            .as_ref()
            .map_or(0.0, |a| a.price_per_night * f64::from(nights));
        let total_cost = flight_cost + lodging_cost;
        let within_budget = budget.allows(total_cost);

        if !within_budget {
            tracing::warn!(
                total_cost,
                budget = preferences.budget,
                "cheapest selection exceeds budget"
            );
        }

        Ok(StageOutput::Booking(BookingOutput {
            flights,
            accommodations,
            selected_flight,
            selected_accommodation,
            nights,
            travelers,
            flight_cost,
            lodging_cost,
            total_cost,
            within_budget,
        }))
    }
}
