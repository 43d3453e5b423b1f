//! Travel-data provider models.
//!
//! Every provider call goes through one of five capabilities. Queries and
//! records are plain value objects; results are wrapped in the uniform
//! [`ProviderResult`] envelope before they reach a stage.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use ts_rs::TS;

/// A travel-data capability. Each capability is served by exactly one adapter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Attractions,
    Places,
    Flights,
    Accommodations,
    Weather,
}

impl Capability {
    /// All capabilities, in a stable order.
    pub const ALL: [Capability; 5] = [
        Capability::Attractions,
        Capability::Places,
        Capability::Flights,
        Capability::Accommodations,
        Capability::Weather,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attractions => "attractions",
            Self::Places => "places",
            Self::Flights => "flights",
            Self::Accommodations => "accommodations",
            Self::Weather => "weather",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct AttractionQuery {
    pub location: String,
    pub limit: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct PlaceQuery {
    pub query: String,
    pub location: String,
    pub limit: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationQuery {
    pub location: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct WeatherQuery {
    pub location: String,
}

/// A query addressed to one capability.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(tag = "capability", content = "query", rename_all = "lowercase")]
pub enum ProviderQuery {
    Attractions(AttractionQuery),
    Places(PlaceQuery),
    Flights(FlightQuery),
    Accommodations(AccommodationQuery),
    Weather(WeatherQuery),
}

impl ProviderQuery {
    pub fn capability(&self) -> Capability {
        match self {
            Self::Attractions(_) => Capability::Attractions,
            Self::Places(_) => Capability::Places,
            Self::Flights(_) => Capability::Flights,
            Self::Accommodations(_) => Capability::Accommodations,
            Self::Weather(_) => Capability::Weather,
        }
    }
}

/// The payload an adapter hands back for a [`ProviderQuery`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(tag = "capability", content = "data", rename_all = "lowercase")]
pub enum ProviderData {
    Attractions(Vec<Attraction>),
    Places(Vec<Place>),
    Flights(Vec<Flight>),
    Accommodations(Vec<Accommodation>),
    Weather(WeatherReport),
}

impl ProviderData {
    pub fn capability(&self) -> Capability {
        match self {
            Self::Attractions(_) => Capability::Attractions,
            Self::Places(_) => Capability::Places,
            Self::Flights(_) => Capability::Flights,
            Self::Accommodations(_) => Capability::Accommodations,
            Self::Weather(_) => Capability::Weather,
        }
    }
}

/// Uniform result envelope: `{ data, success, error? }`.
///
/// On failure `data` holds the empty value of `T`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct ProviderResult<T> {
    pub data: T,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ProviderResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data,
            success: true,
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            data: T::default(),
            success: false,
            error: Some(error.into()),
        }
    }

    /// Collapse the envelope into a `Result`, keeping the error message.
    pub fn into_result(self) -> Result<T, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "provider reported an unknown error".to_string()))
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub id: String,
    pub name: String,
    /// Category label such as "theme parks" or "museums".
    pub category: String,
    pub location: String,
    pub rating: f64,
    pub price_adult: f64,
    pub price_child: f64,
    #[serde(default)]
    pub min_age: Option<u32>,
    pub duration_hours: f64,
    #[serde(default = "default_true")]
    pub family_friendly: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    /// Kind of place, e.g. "restaurant", "park", "playground".
    pub kind: String,
    pub address: String,
    pub rating: f64,
    /// Relative price level, 0 (free) to 4 (expensive).
    pub price_level: u8,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Place {
    pub fn is_dining(&self) -> bool {
        matches!(
            self.kind.to_lowercase().as_str(),
            "restaurant" | "cafe" | "bakery" | "food court"
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub price_per_person: f64,
    #[serde(default)]
    pub stops: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    pub id: String,
    pub name: String,
    /// Kind of lodging, e.g. "hotel", "resort", "vacation rental".
    pub kind: String,
    pub location: String,
    pub price_per_night: f64,
    pub rating: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub max_guests: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub location: String,
    pub temperature_c: f64,
    pub condition: String,
    pub humidity: u32,
    pub wind_kph: f64,
    pub observed_at: DateTime<Utc>,
}

/// Health of a single adapter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealth {
    /// Name of the adapter serving the capability.
    pub adapter: String,
    pub status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

/// Aggregate result of probing every registered adapter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub providers: BTreeMap<Capability, ProviderHealth>,
    pub timestamp: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_result_into_result() {
        let ok: ProviderResult<Vec<u32>> = ProviderResult::ok(vec![1, 2]);
        assert_eq!(ok.into_result(), Ok(vec![1, 2]));

        let failed: ProviderResult<Vec<u32>> = ProviderResult::err("rate limited");
        assert!(failed.data.is_empty());
        assert_eq!(failed.into_result(), Err("rate limited".to_string()));
    }

    #[test]
    fn test_query_capability() {
        let query = ProviderQuery::Weather(WeatherQuery {
            location: "Orlando".to_string(),
        });
        assert_eq!(query.capability(), Capability::Weather);
        assert_eq!(query.capability().to_string(), "weather");
    }

    #[test]
    fn test_place_is_dining() {
        let mut place = Place {
            id: "p1".to_string(),
            name: "Lakeside Grill".to_string(),
            kind: "Restaurant".to_string(),
            address: "1 Lake Rd".to_string(),
            rating: 4.2,
            price_level: 2,
            tags: vec![],
        };
        assert!(place.is_dining());
        place.kind = "park".to_string();
        assert!(!place.is_dining());
    }
}
