//! Mock provider implementations.
//!
//! `MockProvider` generates deterministic travel data seeded from the query,
//! so the same query always yields the same records. Failures and latency can
//! be injected for tests and demos.

use crate::providers::base::{ProviderAdapter, ProviderError};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;
use tp_protocol::travel_models::{
    Accommodation, AccommodationQuery, Attraction, AttractionQuery, Capability, Flight,
    FlightQuery, Place, PlaceQuery, ProviderData, ProviderQuery, WeatherQuery, WeatherReport,
};

const ATTRACTIONS: &[(&str, &str)] = &[
    ("Adventure Kingdom", "theme parks"),
    ("Splash Lagoon", "water parks"),
    ("Science Discovery Center", "museums"),
    ("Wildlife Safari Zoo", "zoos"),
    ("Botanical Gardens", "parks"),
    ("Pirate Dinner Show", "shows"),
    ("Sunset Beach", "beaches"),
    ("Ridge Trail", "hiking"),
    ("Children's Museum", "museums"),
    ("Ocean Aquarium", "aquariums"),
    ("Mini Golf Island", "games"),
    ("Space Center", "museums"),
];

const PLACES: &[(&str, &str)] = &[
    ("Family Diner", "restaurant"),
    ("Central Park", "park"),
    ("Pizza Kitchen", "restaurant"),
    ("Adventure Playground", "playground"),
    ("Farmers Market", "market"),
    ("Garden Cafe", "cafe"),
    ("Riverside Park", "park"),
    ("Ice Cream Parlor", "cafe"),
];

const STREETS: &[&str] = &["Main", "Oak", "Lake", "Harbor", "Maple", "Sunset"];

const AIRLINES: &[(&str, &str)] = &[
    ("SkyWays", "SW"),
    ("BlueJet", "BJ"),
    ("Coastal Air", "CA"),
    ("Summit Airlines", "SA"),
];

const LODGINGS: &[(&str, &str)] = &[
    ("Grand Palms Hotel", "hotel"),
    ("Lakeside Family Resort", "resort"),
    ("Maple Street Rental", "vacation rental"),
    ("Budget Inn", "hotel"),
];

const CONDITIONS: &[&str] = &["Sunny", "Partly cloudy", "Cloudy", "Light rain"];

/// Injected behaviour of a mock adapter.
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    /// When set, every fetch fails with this message.
    pub failure: Option<String>,
    /// When set, the health probe fails with this message.
    pub probe_failure: Option<String>,
    /// Delay applied before answering a fetch.
    pub latency: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct MockProvider {
    name: String,
    capability: Capability,
    behavior: MockBehavior,
}

impl MockProvider {
    pub fn new(capability: Capability, behavior: MockBehavior) -> Self {
        Self {
            name: format!("mock-{capability}"),
            capability,
            behavior,
        }
    }

    pub fn success(capability: Capability) -> Self {
        Self::new(capability, MockBehavior::default())
    }

    /// A mock whose fetches fail with `message`; its probe stays healthy.
    pub fn failing(capability: Capability, message: &str) -> Self {
        Self::new(
            capability,
            MockBehavior {
                failure: Some(message.to_string()),
                ..MockBehavior::default()
            },
        )
    }

    /// A mock that is down: both fetch and probe fail.
    pub fn unavailable(capability: Capability) -> Self {
        let message = format!("{capability} provider unavailable");
        Self::new(
            capability,
            MockBehavior {
                failure: Some(message.clone()),
                probe_failure: Some(message),
                latency: None,
            },
        )
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.behavior.latency = Some(latency);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Capability {
        self.capability
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        match &self.behavior.probe_failure {
            Some(message) => Err(ProviderError::Failed(message.clone())),
            None => Ok(()),
        }
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<ProviderData, ProviderError> {
        if let Some(latency) = self.behavior.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(message) = &self.behavior.failure {
            return Err(ProviderError::Failed(message.clone()));
        }

        let data = match query {
            ProviderQuery::Attractions(q) => ProviderData::Attractions(generate_attractions(q)),
            ProviderQuery::Places(q) => ProviderData::Places(generate_places(q)),
            ProviderQuery::Flights(q) => ProviderData::Flights(generate_flights(q)),
            ProviderQuery::Accommodations(q) => {
                ProviderData::Accommodations(generate_accommodations(q))
            }
            ProviderQuery::Weather(q) => ProviderData::Weather(generate_weather(q)),
        };
        Ok(data)
    }
}

/// Stand-in for a provider whose configuration is unusable.
///
/// Every call and every probe reports the configuration problem.
#[derive(Debug, Clone)]
pub struct MisconfiguredProvider {
    name: String,
    capability: Capability,
    reason: String,
}

impl MisconfiguredProvider {
    pub fn new(name: impl Into<String>, capability: Capability, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capability,
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for MisconfiguredProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Capability {
        self.capability
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        Err(ProviderError::Misconfigured(self.reason.clone()))
    }

    async fn fetch(&self, _query: &ProviderQuery) -> Result<ProviderData, ProviderError> {
        Err(ProviderError::Misconfigured(self.reason.clone()))
    }
}

/// FNV-1a over the lowercased text.
fn seed_from(text: &str) -> u64 {
    text.to_lowercase()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
}

/// Derive the pseudo-random value for the `index`-th record.
fn mix(seed: u64, index: usize) -> u64 {
    let mut x = seed.wrapping_add((index as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15));
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    x
}

fn pick<T: Copy>(items: &[T], value: u64) -> T {
    items[(value % items.len() as u64) as usize]
}

fn generate_attractions(query: &AttractionQuery) -> Vec<Attraction> {
    let seed = seed_from(&query.location);
    let offset = (seed % ATTRACTIONS.len() as u64) as usize;
    let count = (query.limit as usize).min(ATTRACTIONS.len());

    (0..count)
        .map(|i| {
            let v = mix(seed, i);
            let (title, category) = ATTRACTIONS[(offset + i) % ATTRACTIONS.len()];
            let price_adult = 20.0 + (v % 80) as f64;
            Attraction {
                id: format!("attr-{:08x}-{i}", seed as u32),
                name: format!("{} {title}", query.location),
                category: category.to_string(),
                location: query.location.clone(),
                rating: 3.5 + (v % 15) as f64 / 10.0,
                price_adult,
                price_child: (price_adult * 0.6).round(),
                min_age: match v % 4 {
                    0 => Some(8),
                    1 => Some(3),
                    _ => None,
                },
                duration_hours: 1.5 + (v % 5) as f64 * 0.5,
                family_friendly: true,
            }
        })
        .collect()
}

fn generate_places(query: &PlaceQuery) -> Vec<Place> {
    let seed = seed_from(&format!("{}|{}", query.location, query.query));
    let count = (query.limit as usize).min(PLACES.len());
    let tags: Vec<String> = query
        .query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    (0..count)
        .map(|i| {
            let v = mix(seed, i);
            let (title, kind) = PLACES[i];
            Place {
                id: format!("place-{:08x}-{i}", seed as u32),
                name: format!("{} {title}", query.location),
                kind: kind.to_string(),
                address: format!("{} {} St, {}", 100 + v % 900, pick(STREETS, v), query.location),
                rating: 3.8 + (v % 12) as f64 / 10.0,
                price_level: (v % 4) as u8,
                tags: tags.clone(),
            }
        })
        .collect()
}

fn generate_flights(query: &FlightQuery) -> Vec<Flight> {
    let seed = seed_from(&format!(
        "{}|{}|{}",
        query.origin, query.destination, query.departure_date
    ));

    AIRLINES
        .iter()
        .enumerate()
        .map(|(i, (airline, code))| {
            let v = mix(seed, i);
            let stops = (v % 2) as u32;
            let departure = query
                .departure_date
                .and_hms_opt(6 + 3 * i as u32, 0, 0)
                .unwrap_or_default();
            let arrival = departure + ChronoDuration::hours(2 + i64::from(stops) + (v % 3) as i64);
            Flight {
                id: format!("flt-{:08x}-{i}", seed as u32),
                airline: (*airline).to_string(),
                flight_number: format!("{code}{}", 100 + v % 900),
                origin: query.origin.clone(),
                destination: query.destination.clone(),
                departure,
                arrival,
                price_per_person: 150.0 + (v % 350) as f64,
                stops,
            }
        })
        .collect()
}

fn generate_accommodations(query: &AccommodationQuery) -> Vec<Accommodation> {
    let seed = seed_from(&query.location);

    LODGINGS
        .iter()
        .enumerate()
        .map(|(i, (title, kind))| {
            let v = mix(seed, i);
            let mut amenities = vec!["wifi".to_string()];
            if v % 2 == 0 {
                amenities.push("pool".to_string());
            }
            if v % 3 == 0 {
                amenities.push("kitchen".to_string());
            }
            Accommodation {
                id: format!("stay-{:08x}-{i}", seed as u32),
                name: format!("{} {title}", query.location),
                kind: (*kind).to_string(),
                location: query.location.clone(),
                price_per_night: 90.0 + (v % 260) as f64,
                rating: 3.6 + (v % 14) as f64 / 10.0,
                amenities,
                max_guests: 4 + (v % 4) as u32,
            }
        })
        .collect()
}

fn generate_weather(query: &WeatherQuery) -> WeatherReport {
    let v = mix(seed_from(&query.location), 0);
    WeatherReport {
        location: query.location.clone(),
        temperature_c: 10.0 + (v % 25) as f64,
        condition: pick(CONDITIONS, v).to_string(),
        humidity: 40 + (v % 50) as u32,
        wind_kph: 5.0 + (v % 25) as f64,
        observed_at: Utc::now(),
    }
}
