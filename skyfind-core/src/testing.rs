//! In-crate fakes for the provider ports.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::{
    FlightLeg, FlightRouting, Hotel, Itinerary, PlaceEntity, PlaceId, PlaceKind, Price,
};
use crate::ports::{FlightPort, FlightQuery, HotelPort, LocationPort, PortError};

pub(crate) fn place(sky_id: &str, title: &str) -> PlaceEntity {
    PlaceEntity {
        id: PlaceId(format!("{sky_id}-id")),
        title: title.to_owned(),
        suggestion_title: format!("{title} ({sky_id})"),
        subtitle: "Somewhere".to_owned(),
        kind: PlaceKind::Airport,
        routing: FlightRouting {
            sky_id: sky_id.to_owned(),
            entity_id: format!("{sky_id}-entity"),
        },
    }
}

pub(crate) fn itinerary(id: &str, carrier: &str, price: &str) -> Itinerary {
    let departure = NaiveDate::from_ymd_opt(2026, 11, 10)
        .and_then(|day| day.and_hms_opt(8, 30, 0))
        .expect("valid departure");
    let arrival = NaiveDate::from_ymd_opt(2026, 11, 10)
        .and_then(|day| day.and_hms_opt(11, 35, 0))
        .expect("valid arrival");
    Itinerary {
        id: id.to_owned(),
        legs: vec![FlightLeg {
            origin: "LHR".to_owned(),
            destination: "JFK".to_owned(),
            departure,
            arrival,
            duration_minutes: 485,
            stop_count: 0,
            carrier: carrier.to_owned(),
            flight_numbers: vec!["BA117".to_owned()],
        }],
        price: Price {
            formatted: price.to_owned(),
            raw: None,
        },
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Ok(T),
    Status(u16),
    RateLimited,
    Rejected(&'static str),
}

impl<T: Clone> Reply<T> {
    fn produce(&self) -> Result<T, PortError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Status(code) => Err(PortError::Status(*code)),
            Reply::RateLimited => Err(PortError::RateLimited),
            Reply::Rejected(message) => Err(PortError::Rejected((*message).to_owned())),
        }
    }
}

pub(crate) struct MockLocations {
    reply: Reply<Vec<PlaceEntity>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockLocations {
    pub(crate) fn returning(places: Vec<PlaceEntity>) -> Self {
        Self {
            reply: Reply::Ok(places),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            reply: Reply::Status(500),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationPort for MockLocations {
    async fn search_places(&self, _query: &str) -> Result<Vec<PlaceEntity>, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.produce()
    }
}

pub(crate) struct MockFlights {
    reply: Reply<Vec<Itinerary>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_query: Mutex<Option<FlightQuery>>,
}

impl MockFlights {
    pub(crate) fn new(reply: Reply<Vec<Itinerary>>) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub(crate) fn returning(itineraries: Vec<Itinerary>) -> Self {
        Self::new(Reply::Ok(itineraries))
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_query(&self) -> Option<FlightQuery> {
        self.last_query.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl FlightPort for MockFlights {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<Itinerary>, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().expect("mock lock") = Some(query.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.produce()
    }
}

pub(crate) struct MockHotels {
    reply: Reply<Vec<Hotel>>,
    calls: AtomicUsize,
    last_destination: Mutex<Option<String>>,
}

impl MockHotels {
    pub(crate) fn new(reply: Reply<Vec<Hotel>>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_destination: Mutex::new(None),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_destination(&self) -> Option<String> {
        self.last_destination.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl HotelPort for MockHotels {
    async fn search_hotels(&self, destination: &str) -> Result<Vec<Hotel>, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_destination.lock().expect("mock lock") = Some(destination.to_owned());
        self.reply.produce()
    }
}
