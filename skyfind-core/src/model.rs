//! Domain data structures for places, itineraries, and hotels.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Stable identifier of a resolved place.
pub struct PlaceId(pub String);

impl fmt::Display for PlaceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Parameters a flight search needs to route to or from a place.
///
/// A city and its primary airport can share a display name while routing differently,
/// so these are carried separately from [`PlaceId`].
pub struct FlightRouting {
    /// Routing code such as `LHR` or `LOND`.
    pub sky_id: String,
    /// Routing entity identifier.
    pub entity_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Kind of place returned by the lookup endpoint.
pub enum PlaceKind {
    /// A single airport.
    Airport,
    /// A city, possibly covering several airports.
    City,
    /// Anything else the provider returns (regions, countries).
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Resolved location candidate.
///
/// Immutable once returned by a resolver. Equality and hashing only consider
/// [`PlaceEntity::id`], never the display text.
pub struct PlaceEntity {
    /// Stable identifier.
    pub id: PlaceId,
    /// Display title, e.g. `London Heathrow`.
    pub title: String,
    /// Title including the code, e.g. `London Heathrow (LHR)`.
    pub suggestion_title: String,
    /// Region or country.
    pub subtitle: String,
    /// Airport or city.
    pub kind: PlaceKind,
    /// Routing pair used by flight searches.
    pub routing: FlightRouting,
}

impl PartialEq for PlaceEntity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PlaceEntity {}

impl Hash for PlaceEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One directional leg of an itinerary.
pub struct FlightLeg {
    /// Display code of the departure airport.
    pub origin: String,
    /// Display code of the arrival airport.
    pub destination: String,
    /// Local departure time.
    pub departure: NaiveDateTime,
    /// Local arrival time.
    pub arrival: NaiveDateTime,
    /// Total duration in minutes.
    pub duration_minutes: u32,
    /// Number of intermediate stops.
    pub stop_count: u32,
    /// Marketing carrier name.
    pub carrier: String,
    /// Flight numbers of the leg's segments, in order.
    pub flight_numbers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Price attached to an itinerary.
pub struct Price {
    /// Provider-formatted price such as `$412`.
    pub formatted: String,
    /// Raw amount when the provider sends one.
    pub raw: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Bookable itinerary as returned by a flight search.
pub struct Itinerary {
    /// Provider identifier.
    pub id: String,
    /// Legs in travel order; round trips carry two.
    pub legs: Vec<FlightLeg>,
    /// Price for all passengers.
    pub price: Price,
}

impl Itinerary {
    /// The outbound leg, if the itinerary has any legs.
    #[must_use]
    pub fn outbound(&self) -> Option<&FlightLeg> {
        self.legs.first()
    }

    /// Carrier of the outbound leg.
    #[must_use]
    pub fn carrier(&self) -> Option<&str> {
        self.outbound().map(|leg| leg.carrier.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Latitude and longitude in decimal degrees.
pub struct Coordinates {
    /// Latitude, positive north.
    pub lat: f64,
    /// Longitude, positive east.
    pub lon: f64,
}

impl Coordinates {
    /// Parse the provider's `"lat, lon"` representation.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (lat, lon) = raw.split_once(',')?;
        Some(Self {
            lat: lat.trim().parse().ok()?,
            lon: lon.trim().parse().ok()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Hotel or hotel destination near the searched destination.
pub struct Hotel {
    /// Provider identifier.
    pub entity_id: String,
    /// Display name.
    pub name: String,
    /// Locality breadcrumb such as `Manhattan, New York, United States`.
    pub hierarchy: String,
    /// Position, when the provider sends a parsable one.
    pub location: Option<Coordinates>,
}
