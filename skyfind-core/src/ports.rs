//! Traits describing provider capabilities and shared helper types.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Error as ReqwestError;

use crate::model::{FlightRouting, Hotel, Itinerary, PlaceEntity};
use crate::trip::{CabinClass, Passengers};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to provider backends.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Transport(#[from] ReqwestError),
    /// Provider answered with a non-success HTTP status.
    #[error("Provider returned HTTP {0}")]
    Status(u16),
    /// Provider answered with HTTP 429.
    #[error("Rate limited by provider")]
    RateLimited,
    /// Response body did not have any of the known shapes.
    #[error("Unexpected response format: {0}")]
    Format(String),
    /// Provider sent an explicit `status: false` payload.
    #[error("Provider rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fully validated flight search parameters.
pub struct FlightQuery {
    /// Routing of the origin place.
    pub origin: FlightRouting,
    /// Routing of the destination place.
    pub destination: FlightRouting,
    /// Outbound date.
    pub date: NaiveDate,
    /// Return date for round trips.
    pub return_date: Option<NaiveDate>,
    /// Requested cabin.
    pub cabin_class: CabinClass,
    /// Passenger counts.
    pub passengers: Passengers,
}

impl FlightQuery {
    /// ISO representation of the outbound date.
    #[must_use]
    pub fn date_param(&self) -> String {
        self.date.format(ISO_DATE).to_string()
    }

    /// ISO representation of the return date, if any.
    #[must_use]
    pub fn return_date_param(&self) -> Option<String> {
        self.return_date
            .map(|date| date.format(ISO_DATE).to_string())
    }
}

/// Date format the provider expects in query strings.
pub const ISO_DATE: &str = "%Y-%m-%d";

#[async_trait]
/// Trait for place lookup backends.
pub trait LocationPort: Send + Sync {
    /// Look up airports and cities matching free text, in provider rank order.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn search_places(&self, query: &str) -> Result<Vec<PlaceEntity>, PortError>;
}

#[async_trait]
/// Trait for flight search backends.
pub trait FlightPort: Send + Sync {
    /// Run a flight search. Itineraries come back in provider order.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the provider rejects it.
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<Itinerary>, PortError>;
}

#[async_trait]
/// Trait for hotel lookup backends.
pub trait HotelPort: Send + Sync {
    /// Look up hotels for a destination display name.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn search_hotels(&self, destination: &str) -> Result<Vec<Hotel>, PortError>;
}
