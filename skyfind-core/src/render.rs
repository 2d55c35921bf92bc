//! Pure mapping from [`SearchStatus`] to something a front end can draw.

use crate::model::{Coordinates, FlightLeg, Hotel, Itinerary, PlaceKind};
use crate::orchestrator::{HotelOutcome, SearchFailure, SearchResults, SearchStatus};

/// Prompt shown before the first search.
pub const WELCOME_PROMPT: &str = "Pick an origin and a destination, then search for flights";
/// Prompt shown when a search found nothing.
pub const NO_RESULTS_PROMPT: &str = "No flights found for these dates. Try another day or cabin.";
/// Message shown for HTTP 429.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please try again later.";
/// Message shown for any other failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch flights. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Display-ready itinerary.
pub struct ItinerarySummary {
    /// Provider id, for keyed lists.
    pub id: String,
    /// Marketing carrier.
    pub carrier: String,
    /// First flight number of the outbound leg.
    pub flight_number: String,
    /// Outbound departure as `HH:MM`.
    pub departure_time: String,
    /// Outbound arrival as `HH:MM`.
    pub arrival_time: String,
    /// Route codes, e.g. `LHR → JFK`.
    pub route: String,
    /// Outbound duration, e.g. `7h 5m`.
    pub duration: String,
    /// `Nonstop`, `1 stop`, `2 stops`.
    pub stops: String,
    /// Formatted price.
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Display-ready hotel.
pub struct HotelSummary {
    /// Hotel name.
    pub name: String,
    /// Locality breadcrumb.
    pub hierarchy: String,
    /// Coordinates like `40.71°N, 74.01°W`, if known.
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Hotel section below the itineraries.
pub enum HotelsView {
    /// No hotel lookup was made.
    Hidden,
    /// Lookup finished with no matches.
    Empty {
        /// Destination the lookup was for.
        destination: String,
    },
    /// Hotels to list.
    List {
        /// Destination the lookup was for.
        destination: String,
        /// Hotels in provider order.
        hotels: Vec<HotelSummary>,
    },
    /// Lookup failed; shown as a note only.
    Unavailable {
        /// Destination the lookup was for.
        destination: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What the result area should show.
pub enum ResultView {
    /// Nothing searched yet.
    Welcome {
        /// Prompt text.
        prompt: &'static str,
    },
    /// Search in flight.
    Spinner,
    /// Search failed.
    Error {
        /// User-facing message.
        message: String,
    },
    /// Search succeeded with no itineraries.
    Empty {
        /// Prompt text.
        prompt: &'static str,
        /// Hotel section.
        hotels: HotelsView,
    },
    /// Itineraries to list.
    Itineraries {
        /// Summaries in provider order.
        items: Vec<ItinerarySummary>,
        /// Hotel section.
        hotels: HotelsView,
    },
}

/// Map a search status to its view.
#[must_use]
pub fn render(status: &SearchStatus) -> ResultView {
    match status {
        SearchStatus::Idle => ResultView::Welcome {
            prompt: WELCOME_PROMPT,
        },
        SearchStatus::Loading => ResultView::Spinner,
        SearchStatus::Failed(failure) => ResultView::Error {
            message: failure_message(failure),
        },
        SearchStatus::Success(results) => render_results(results),
    }
}

fn render_results(results: &SearchResults) -> ResultView {
    let hotels = hotels_view(&results.destination, &results.hotels);
    if results.itineraries.is_empty() {
        return ResultView::Empty {
            prompt: NO_RESULTS_PROMPT,
            hotels,
        };
    }
    ResultView::Itineraries {
        items: results.itineraries.iter().map(summarize).collect(),
        hotels,
    }
}

/// User-facing text for a failure.
#[must_use]
pub fn failure_message(failure: &SearchFailure) -> String {
    match failure {
        SearchFailure::RateLimited => RATE_LIMIT_MESSAGE.to_owned(),
        SearchFailure::TimedOut(_) => {
            "The flight search took too long. Please try again.".to_owned()
        }
        SearchFailure::Rejected(detail) if !detail.trim().is_empty() => {
            format!("The provider could not complete the search: {detail}")
        }
        SearchFailure::Transport(_) | SearchFailure::Format(_) | SearchFailure::Rejected(_) => {
            GENERIC_FAILURE_MESSAGE.to_owned()
        }
    }
}

/// Summarize one itinerary.
#[must_use]
pub fn summarize(itinerary: &Itinerary) -> ItinerarySummary {
    let outbound = itinerary.outbound();
    let route = outbound.map_or_else(String::new, |leg| {
        format!("{} → {}", leg.origin, leg.destination)
    });
    ItinerarySummary {
        id: itinerary.id.clone(),
        carrier: itinerary.carrier().unwrap_or("Unknown airline").to_owned(),
        flight_number: outbound
            .and_then(|leg| leg.flight_numbers.first())
            .map_or_else(|| "N/A".to_owned(), Clone::clone),
        departure_time: outbound.map_or_else(String::new, |leg| clock(leg, true)),
        // Arrival of the outbound leg, not of the return.
        arrival_time: outbound.map_or_else(String::new, |leg| clock(leg, false)),
        route,
        duration: outbound.map_or_else(String::new, |leg| format_duration(leg.duration_minutes)),
        stops: stops_label(outbound.map_or(0, |leg| leg.stop_count)),
        price: itinerary.price.formatted.clone(),
    }
}

fn clock(leg: &FlightLeg, departure: bool) -> String {
    let time = if departure { leg.departure } else { leg.arrival };
    time.format("%H:%M").to_string()
}

/// Format minutes as `7h 5m`.
#[must_use]
pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn stops_label(stops: u32) -> String {
    match stops {
        0 => "Nonstop".to_owned(),
        1 => "1 stop".to_owned(),
        many => format!("{many} stops"),
    }
}

/// Tag shown beside a suggestion; empty when the kind is not worth naming.
#[must_use]
pub fn place_kind_label(kind: PlaceKind) -> &'static str {
    match kind {
        PlaceKind::Airport => "Airport",
        PlaceKind::City => "City",
        PlaceKind::Other => "",
    }
}

fn hotels_view(destination: &str, outcome: &HotelOutcome) -> HotelsView {
    let destination = destination.to_owned();
    match outcome {
        HotelOutcome::NotRequested => HotelsView::Hidden,
        HotelOutcome::Unavailable(_) => HotelsView::Unavailable { destination },
        HotelOutcome::Found(hotels) if hotels.is_empty() => HotelsView::Empty { destination },
        HotelOutcome::Found(hotels) => HotelsView::List {
            destination,
            hotels: hotels.iter().map(summarize_hotel).collect(),
        },
    }
}

fn summarize_hotel(hotel: &Hotel) -> HotelSummary {
    HotelSummary {
        name: hotel.name.clone(),
        hierarchy: hotel.hierarchy.clone(),
        location: hotel.location.map(format_coordinates),
    }
}

/// Format coordinates as `40.71°N, 74.01°W`.
#[must_use]
pub fn format_coordinates(coordinates: Coordinates) -> String {
    let lat_hemisphere = if coordinates.lat >= 0.0 { 'N' } else { 'S' };
    let lon_hemisphere = if coordinates.lon >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.2}°{lat_hemisphere}, {:.2}°{lon_hemisphere}",
        coordinates.lat.abs(),
        coordinates.lon.abs()
    )
}
