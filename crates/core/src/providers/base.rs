//! Base provider trait and supporting types.

use async_trait::async_trait;
use thiserror::Error;
use tp_protocol::travel_models::{Capability, ProviderData, ProviderQuery};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Failure reported by the adapter itself, message passed through verbatim.
    #[error("{0}")]
    Failed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Provider misconfigured: {0}")]
    Misconfigured(String),
    #[error("No provider registered for {0}")]
    NotRegistered(Capability),
    #[error("Adapter '{adapter}' answered a {expected} query with {actual} data")]
    UnexpectedPayload {
        adapter: String,
        expected: Capability,
        actual: Capability,
    },
}

/// A normalized access point to one travel-data capability.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Human-readable adapter name, reported by the health check.
    fn name(&self) -> &str;

    /// The capability this adapter serves.
    fn capability(&self) -> Capability;

    /// Lightweight liveness probe.
    async fn probe(&self) -> Result<(), ProviderError>;

    async fn fetch(&self, query: &ProviderQuery) -> Result<ProviderData, ProviderError>;
}

/// Reject queries that no adapter could answer meaningfully.
pub fn validate_query(query: &ProviderQuery) -> Result<(), ProviderError> {
    fn require(field: &str, value: &str) -> Result<(), ProviderError> {
        if value.trim().is_empty() {
            return Err(ProviderError::InvalidQuery(format!("{field} must not be empty")));
        }
        Ok(())
    }

    match query {
        ProviderQuery::Attractions(q) => {
            require("location", &q.location)?;
            if q.limit == 0 {
                return Err(ProviderError::InvalidQuery("limit must be positive".to_string()));
            }
        }
        ProviderQuery::Places(q) => {
            require("location", &q.location)?;
            if q.limit == 0 {
                return Err(ProviderError::InvalidQuery("limit must be positive".to_string()));
            }
        }
        ProviderQuery::Flights(q) => {
            require("origin", &q.origin)?;
            require("destination", &q.destination)?;
            if q.adults == 0 {
                return Err(ProviderError::InvalidQuery(
                    "at least one adult must travel".to_string(),
                ));
            }
            if let Some(return_date) = q.return_date {
                if return_date < q.departure_date {
                    return Err(ProviderError::InvalidQuery(
                        "return date precedes departure date".to_string(),
                    ));
                }
            }
        }
        ProviderQuery::Accommodations(q) => {
            require("location", &q.location)?;
            if q.adults == 0 {
                return Err(ProviderError::InvalidQuery(
                    "at least one adult must stay".to_string(),
                ));
            }
            if q.check_out < q.check_in {
                return Err(ProviderError::InvalidQuery(
                    "check-out precedes check-in".to_string(),
                ));
            }
        }
        ProviderQuery::Weather(q) => require("location", &q.location)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tp_protocol::travel_models::{AccommodationQuery, AttractionQuery, WeatherQuery};

    #[test]
    fn test_validate_query_accepts_valid_queries() {
        let query = ProviderQuery::Attractions(AttractionQuery {
            location: "Orlando".to_string(),
            limit: 10,
        });
        assert!(validate_query(&query).is_ok());
    }

    #[test]
    fn test_validate_query_rejects_blank_location() {
        let query = ProviderQuery::Weather(WeatherQuery {
            location: "   ".to_string(),
        });
        let err = validate_query(&query).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidQuery(_)));
        assert!(err.to_string().contains("location"));
    }

    #[test]
    fn test_validate_query_rejects_inverted_stay() {
        let query = ProviderQuery::Accommodations(AccommodationQuery {
            location: "Orlando".to_string(),
            check_in: "2024-06-22".parse().unwrap(),
            check_out: "2024-06-15".parse().unwrap(),
            adults: 2,
            children: 0,
        });
        assert!(matches!(
            validate_query(&query),
            Err(ProviderError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ProviderError::Failed("rate limited".to_string()).to_string(), "rate limited");
        assert_eq!(ProviderError::RateLimited.to_string(), "rate limited");
        assert_eq!(
            ProviderError::NotRegistered(Capability::Weather).to_string(),
            "No provider registered for weather"
        );
    }
}
