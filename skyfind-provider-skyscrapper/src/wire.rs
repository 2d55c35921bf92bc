//! Wire types for the sky-scrapper API and normalization into core models.
//!
//! The API is not consistent about where it puts results: lookups come back as a
//! `data` list or as a `data.current` / `data.nearby` pair, flight searches as a bare
//! list, under `data`, or under `data.itineraries`, and any endpoint may answer with
//! `status: false` instead. Everything is funnelled through the `normalize_*`
//! functions so nothing outside this module sees the raw shape.

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use skyfind_core::{
    model::{
        Coordinates, FlightLeg, FlightRouting, Hotel, Itinerary, PlaceEntity, PlaceId, PlaceKind,
        Price,
    },
    ports::PortError,
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlaceData {
    List(Vec<PlaceEntry>),
    Nearby {
        #[serde(default)]
        current: Option<PlaceEntry>,
        #[serde(default)]
        nearby: Vec<PlaceEntry>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceEntry {
    #[serde(default)]
    sky_id: Option<String>,
    #[serde(default)]
    entity_id: Option<String>,
    presentation: Presentation,
    #[serde(default)]
    navigation: Option<Navigation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Presentation {
    title: String,
    #[serde(default)]
    suggestion_title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    sky_id: Option<String>,
    #[serde(default)]
    entity_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Navigation {
    #[serde(default)]
    entity_id: Option<String>,
    #[serde(default)]
    entity_type: Option<String>,
    #[serde(default)]
    relevant_flight_params: Option<RoutingParams>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoutingParams {
    sky_id: String,
    entity_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItineraryEntry {
    id: String,
    price: PriceEntry,
    legs: Vec<LegEntry>,
}

#[derive(Debug, Deserialize)]
struct PriceEntry {
    #[serde(default)]
    raw: Option<f64>,
    #[serde(default)]
    formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegEntry {
    origin: AirportRef,
    destination: AirportRef,
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
    duration_in_minutes: u32,
    #[serde(default)]
    stop_count: u32,
    #[serde(default)]
    carriers: Option<Carriers>,
    #[serde(default)]
    segments: Vec<SegmentEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AirportRef {
    #[serde(default)]
    display_code: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Carriers arrive either grouped (`{marketing: [...]}`) or as a plain list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Carriers {
    Grouped { marketing: Vec<Carrier> },
    Flat(Vec<Carrier>),
}

#[derive(Debug, Deserialize)]
struct Carrier {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentEntry {
    flight_number: String,
    #[serde(default)]
    marketing_carrier: Option<SegmentCarrier>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentCarrier {
    #[serde(default)]
    alternate_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotelEntry {
    entity_id: String,
    entity_name: String,
    #[serde(default)]
    hierarchy: String,
    #[serde(default)]
    location: Option<String>,
}

/// Normalize a `searchAirport` response body.
///
/// # Errors
///
/// Returns [`PortError::Rejected`] for `status: false` payloads and
/// [`PortError::Format`] when `data` has no known shape.
pub fn normalize_places(body: Value) -> Result<Vec<PlaceEntity>, PortError> {
    let data = take_data(body)?;
    let entries = match decode::<PlaceData>(data)? {
        PlaceData::List(entries) => entries,
        PlaceData::Nearby { current, nearby } => current.into_iter().chain(nearby).collect(),
    };
    Ok(entries.into_iter().filter_map(into_place).collect())
}

/// Normalize a `searchFlights` response body.
///
/// # Errors
///
/// Returns [`PortError::Rejected`] for `status: false` payloads and
/// [`PortError::Format`] when no itinerary list can be found.
pub fn normalize_flights(mut body: Value) -> Result<Vec<Itinerary>, PortError> {
    reject_failed_status(&body)?;
    let items = if body.is_array() {
        body
    } else if let Some(items) = body
        .pointer_mut("/data/itineraries")
        .filter(|items| items.is_array())
    {
        items.take()
    } else if let Some(items) = body.get_mut("data").filter(|items| items.is_array()) {
        items.take()
    } else {
        return Err(PortError::Format("no itinerary list in response".to_owned()));
    };
    let entries = decode::<Vec<ItineraryEntry>>(items)?;
    Ok(entries.into_iter().map(into_itinerary).collect())
}

/// Normalize a `searchDestinationOrHotel` response body.
///
/// # Errors
///
/// Returns [`PortError::Rejected`] for `status: false` payloads and
/// [`PortError::Format`] when `data` is not a list of hotels.
pub fn normalize_hotels(body: Value) -> Result<Vec<Hotel>, PortError> {
    let data = take_data(body)?;
    let entries = decode::<Vec<HotelEntry>>(data)?;
    Ok(entries
        .into_iter()
        .map(|entry| Hotel {
            entity_id: entry.entity_id,
            name: entry.entity_name,
            hierarchy: entry.hierarchy,
            location: entry.location.as_deref().and_then(Coordinates::parse),
        })
        .collect())
}

fn take_data(mut body: Value) -> Result<Value, PortError> {
    reject_failed_status(&body)?;
    body.get_mut("data")
        .map(Value::take)
        .ok_or_else(|| PortError::Format("missing data field".to_owned()))
}

fn reject_failed_status(body: &Value) -> Result<(), PortError> {
    if body.get("status").and_then(Value::as_bool) != Some(false) {
        return Ok(());
    }
    let message = match body.get("message") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => "provider reported a failure".to_owned(),
        Some(other) => other.to_string(),
    };
    Err(PortError::Rejected(message))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, PortError> {
    serde_json::from_value(value).map_err(|err| PortError::Format(err.to_string()))
}

fn into_place(entry: PlaceEntry) -> Option<PlaceEntity> {
    let PlaceEntry {
        sky_id,
        entity_id,
        presentation,
        navigation,
    } = entry;
    let (nav_entity_id, entity_type, routing) = match navigation {
        Some(nav) => (nav.entity_id, nav.entity_type, nav.relevant_flight_params),
        None => (None, None, None),
    };

    let Some(id) = entity_id
        .or_else(|| presentation.entity_id.clone())
        .or(nav_entity_id)
    else {
        debug!(title = %presentation.title, "skipping place without an entity id");
        return None;
    };
    let suggestion_title = presentation
        .suggestion_title
        .unwrap_or_else(|| presentation.title.clone());

    let routing = match routing {
        Some(params) => FlightRouting {
            sky_id: params.sky_id,
            entity_id: params.entity_id,
        },
        None => FlightRouting {
            sky_id: sky_id
                .or(presentation.sky_id)
                .or_else(|| code_in_parentheses(&suggestion_title))
                .unwrap_or_default(),
            entity_id: id.clone(),
        },
    };

    Some(PlaceEntity {
        id: PlaceId(id),
        title: presentation.title,
        suggestion_title,
        subtitle: presentation.subtitle.unwrap_or_default(),
        kind: place_kind(entity_type.as_deref()),
        routing,
    })
}

/// Extract `LHR` from `London Heathrow (LHR)`.
fn code_in_parentheses(text: &str) -> Option<String> {
    let (_, rest) = text.rsplit_once('(')?;
    let (code, _) = rest.split_once(')')?;
    let code = code.trim();
    (!code.is_empty()).then(|| code.to_owned())
}

fn place_kind(entity_type: Option<&str>) -> PlaceKind {
    match entity_type.map(str::to_ascii_uppercase).as_deref() {
        Some("AIRPORT") => PlaceKind::Airport,
        Some("CITY") => PlaceKind::City,
        _ => PlaceKind::Other,
    }
}

fn into_itinerary(entry: ItineraryEntry) -> Itinerary {
    let formatted = match (entry.price.formatted, entry.price.raw) {
        (Some(formatted), _) => formatted,
        (None, Some(raw)) => format!("${raw:.2}"),
        (None, None) => "N/A".to_owned(),
    };
    Itinerary {
        id: entry.id,
        legs: entry.legs.into_iter().map(into_leg).collect(),
        price: Price {
            formatted,
            raw: entry.price.raw,
        },
    }
}

fn into_leg(leg: LegEntry) -> FlightLeg {
    let carrier = match leg.carriers {
        Some(Carriers::Grouped { marketing } | Carriers::Flat(marketing)) => {
            marketing.into_iter().next().map(|carrier| carrier.name)
        }
        None => None,
    }
    .unwrap_or_else(|| "Unknown airline".to_owned());

    let flight_numbers = leg
        .segments
        .into_iter()
        .map(|segment| {
            match segment
                .marketing_carrier
                .and_then(|carrier| carrier.alternate_id)
            {
                Some(prefix) if !segment.flight_number.starts_with(&prefix) => {
                    format!("{prefix}{}", segment.flight_number)
                }
                _ => segment.flight_number,
            }
        })
        .collect();

    FlightLeg {
        origin: airport_label(leg.origin),
        destination: airport_label(leg.destination),
        departure: leg.departure,
        arrival: leg.arrival,
        duration_minutes: leg.duration_in_minutes,
        stop_count: leg.stop_count,
        carrier,
        flight_numbers,
    }
}

fn airport_label(airport: AirportRef) -> String {
    airport
        .display_code
        .or(airport.name)
        .unwrap_or_else(|| "?".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn itinerary_json(id: &str) -> Value {
        json!({
            "id": id,
            "price": { "raw": 412.3, "formatted": "$413" },
            "legs": [{
                "origin": { "displayCode": "LHR", "name": "London Heathrow" },
                "destination": { "displayCode": "JFK", "name": "New York John F. Kennedy" },
                "departure": "2026-11-10T08:30:00",
                "arrival": "2026-11-10T11:35:00",
                "durationInMinutes": 485,
                "stopCount": 0,
                "carriers": { "marketing": [{ "name": "British Airways" }] },
                "segments": [{
                    "flightNumber": "117",
                    "marketingCarrier": { "alternateId": "BA" }
                }]
            }]
        })
    }

    #[test]
    fn flights_nested_under_data_itineraries() {
        let body = json!({
            "status": true,
            "data": { "context": { "status": "complete" },
                      "itineraries": [itinerary_json("a"), itinerary_json("b")] }
        });
        let itineraries = normalize_flights(body).expect("normalized");

        let ids: Vec<&str> = itineraries.iter().map(|it| it.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"], "provider order");

        let leg = itineraries
            .first()
            .and_then(Itinerary::outbound)
            .expect("one leg");
        assert_eq!(leg.carrier, "British Airways", "grouped carriers");
        assert_eq!(leg.flight_numbers, ["BA117"], "carrier prefix added");
        assert_eq!(leg.origin, "LHR", "display code");
        assert_eq!(leg.duration_minutes, 485, "duration");
    }

    #[test]
    fn flights_as_bare_array_or_data_array() {
        let bare = normalize_flights(json!([itinerary_json("x")])).expect("bare array");
        assert_eq!(bare.len(), 1, "bare array");

        let wrapped =
            normalize_flights(json!({ "data": [itinerary_json("y")] })).expect("data array");
        assert_eq!(wrapped.len(), 1, "data array");
    }

    #[test]
    fn status_false_is_rejected_not_empty() {
        let body = json!({ "status": false, "message": "Something went wrong", "data": [] });
        let err = normalize_flights(body).expect_err("rejected");
        assert!(
            matches!(&err, PortError::Rejected(message) if message == "Something went wrong"),
            "{err:?}"
        );

        let body = json!({ "status": false, "message": [{ "date": "Invalid date" }] });
        let err = normalize_flights(body).expect_err("rejected");
        assert!(matches!(err, PortError::Rejected(_)), "structured message kept");
    }

    #[test]
    fn unknown_shapes_are_format_errors() {
        let err = normalize_flights(json!({ "data": { "context": {} } })).expect_err("format");
        assert!(matches!(err, PortError::Format(_)), "{err:?}");

        let err = normalize_flights(json!([{ "id": 1 }])).expect_err("format");
        assert!(matches!(err, PortError::Format(_)), "bad item: {err:?}");
    }

    #[test]
    fn empty_itinerary_list_is_a_success() {
        let body = json!({ "status": true, "data": { "itineraries": [] } });
        assert!(normalize_flights(body).expect("ok").is_empty(), "empty but valid");
    }

    #[test]
    fn flat_carriers_and_missing_formatted_price() {
        let mut item = itinerary_json("c");
        for (path, replacement) in [
            ("/price", json!({ "raw": 99.5 })),
            ("/legs/0/carriers", json!([{ "name": "Aer Lingus" }])),
            ("/legs/0/segments", json!([{ "flightNumber": "EI105" }])),
        ] {
            *item.pointer_mut(path).expect("fixture path") = replacement;
        }

        let itineraries = normalize_flights(json!([item])).expect("normalized");
        let first = itineraries.first().expect("one");
        assert_eq!(first.price.formatted, "$99.50", "formatted from raw");
        assert_eq!(first.carrier(), Some("Aer Lingus"), "flat carriers");
        assert_eq!(
            first.outbound().map(|leg| leg.flight_numbers.clone()),
            Some(vec!["EI105".to_owned()]),
            "no prefix"
        );
    }

    #[test]
    fn places_from_data_list_use_relevant_flight_params() {
        let body = json!({
            "status": true,
            "data": [{
                "skyId": "LOND",
                "entityId": "27544008",
                "presentation": {
                    "title": "London",
                    "suggestionTitle": "London (Any)",
                    "subtitle": "United Kingdom"
                },
                "navigation": {
                    "entityId": "27544008",
                    "entityType": "CITY",
                    "relevantFlightParams": { "skyId": "LOND", "entityId": "27544008" }
                }
            }, {
                "skyId": "LHR",
                "entityId": "95565050",
                "presentation": {
                    "title": "London Heathrow",
                    "suggestionTitle": "London Heathrow (LHR)",
                    "subtitle": "United Kingdom"
                },
                "navigation": {
                    "entityType": "AIRPORT",
                    "relevantFlightParams": { "skyId": "LHR", "entityId": "95565050" }
                }
            }]
        });
        let places = normalize_places(body).expect("normalized");

        let titles: Vec<&str> = places.iter().map(|place| place.title.as_str()).collect();
        assert_eq!(titles, ["London", "London Heathrow"], "rank order");
        let heathrow = places.get(1).expect("second place");
        assert_eq!(heathrow.kind, PlaceKind::Airport, "kind");
        assert_eq!(heathrow.routing.sky_id, "LHR", "routing code");
        assert_eq!(heathrow.id, PlaceId("95565050".to_owned()), "stable id");
    }

    #[test]
    fn places_from_current_and_nearby() {
        let body = json!({
            "status": true,
            "data": {
                "current": { "presentation": {
                    "title": "New York John F. Kennedy",
                    "suggestionTitle": "New York John F. Kennedy (JFK)",
                    "subtitle": "United States",
                    "entityId": "95565058"
                }},
                "nearby": [{ "presentation": {
                    "title": "Newark",
                    "suggestionTitle": "Newark (EWR)",
                    "subtitle": "United States",
                    "entityId": "95565059"
                }}, { "presentation": { "title": "No id here" } }]
            }
        });
        let places = normalize_places(body).expect("normalized");

        let codes: Vec<&str> = places.iter().map(|place| place.routing.sky_id.as_str()).collect();
        assert_eq!(codes, ["JFK", "EWR"], "current first, id-less entries dropped");
    }

    #[test]
    fn hotels_parse_coordinates() {
        let body = json!({
            "status": true,
            "data": [{
                "entityName": "New York",
                "entityId": "27537542",
                "class": "City",
                "hierarchy": "New York, United States",
                "location": "40.7127, -74.0059"
            }, {
                "entityName": "Hotel Nowhere",
                "entityId": "1",
                "location": "unknown"
            }]
        });
        let hotels = normalize_hotels(body).expect("normalized");

        let first = hotels.first().expect("first hotel");
        assert_eq!(first.name, "New York", "name");
        let location = first.location.expect("parsed");
        assert!((location.lon + 74.0059).abs() < 1e-9, "longitude");
        assert_eq!(hotels.get(1).and_then(|hotel| hotel.location), None, "unparsable");
    }

    #[test]
    fn code_extraction() {
        assert_eq!(code_in_parentheses("Paris (CDG)").as_deref(), Some("CDG"), "code");
        assert_eq!(code_in_parentheses("Paris"), None, "no code");
        assert_eq!(code_in_parentheses("Paris ()"), None, "empty code");
    }
}
