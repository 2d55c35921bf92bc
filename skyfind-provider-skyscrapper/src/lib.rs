//! Provider implementation for the sky-scrapper flight data API on RapidAPI.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};

use skyfind_core::{
    model::{Hotel, Itinerary, PlaceEntity},
    ports::{FlightPort, FlightQuery, HotelPort, LocationPort, PortError},
    provider::{ProviderBundle, ProviderMeta},
};

mod wire;

pub use wire::{normalize_flights, normalize_hotels, normalize_places};

/// Default API root.
pub const BASE_URL: &str = "https://sky-scrapper.p.rapidapi.com/api/v1";

/// Default value of the `x-rapidapi-host` header.
pub const DEFAULT_HOST: &str = "sky-scrapper.p.rapidapi.com";

const LOCALE: &str = "en-US";

#[derive(Clone)]
/// Connection settings for the API.
pub struct SkyScrapperConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Value of the `x-rapidapi-host` header.
    pub api_host: String,
    /// Subscription key sent as `x-rapidapi-key`.
    pub api_key: String,
}

impl SkyScrapperConfig {
    /// Settings for the public endpoint with the given key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            base_url: BASE_URL.to_owned(),
            api_host: DEFAULT_HOST.to_owned(),
            api_key,
        }
    }
}

impl fmt::Debug for SkyScrapperConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SkyScrapperConfig")
            .field("base_url", &self.base_url)
            .field("api_host", &self.api_host)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
struct Api {
    client: Client,
    config: Arc<SkyScrapperConfig>,
}

impl Api {
    fn get(&self, path: &str) -> RequestBuilder {
        let base = self.config.base_url.trim_end_matches('/');
        self.client
            .get(format!("{base}{path}"))
            .header("x-rapidapi-key", &self.config.api_key)
            .header("x-rapidapi-host", &self.config.api_host)
    }
}

/// Airport and city lookup.
pub struct SkyScrapperLocationPort {
    api: Api,
}

impl SkyScrapperLocationPort {
    /// Create a new location port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, config: Arc<SkyScrapperConfig>) -> Self {
        Self {
            api: Api { client, config },
        }
    }
}

#[async_trait]
impl LocationPort for SkyScrapperLocationPort {
    #[instrument(skip(self))]
    async fn search_places(&self, query: &str) -> Result<Vec<PlaceEntity>, PortError> {
        let req = self
            .api
            .get("/flights/searchAirport")
            .query(&[("query", query), ("locale", LOCALE)]);
        let places = normalize_places(fetch_json(req).await?)?;
        debug!(count = places.len(), "place lookup answered");
        Ok(places)
    }
}

/// Flight search.
pub struct SkyScrapperFlightPort {
    api: Api,
}

impl SkyScrapperFlightPort {
    /// Create a new flight port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, config: Arc<SkyScrapperConfig>) -> Self {
        Self {
            api: Api { client, config },
        }
    }
}

#[async_trait]
impl FlightPort for SkyScrapperFlightPort {
    #[instrument(
        skip_all,
        fields(origin = %query.origin.sky_id, destination = %query.destination.sky_id)
    )]
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<Itinerary>, PortError> {
        let req = self
            .api
            .get("/flights/searchFlights")
            .query(&flight_params(query));
        let itineraries = normalize_flights(fetch_json(req).await?)?;
        debug!(count = itineraries.len(), "flight search answered");
        Ok(itineraries)
    }
}

/// Hotel destination lookup.
pub struct SkyScrapperHotelPort {
    api: Api,
}

impl SkyScrapperHotelPort {
    /// Create a new hotel port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, config: Arc<SkyScrapperConfig>) -> Self {
        Self {
            api: Api { client, config },
        }
    }
}

#[async_trait]
impl HotelPort for SkyScrapperHotelPort {
    #[instrument(skip(self))]
    async fn search_hotels(&self, destination: &str) -> Result<Vec<Hotel>, PortError> {
        let req = self
            .api
            .get("/hotels/searchDestinationOrHotel")
            .query(&[("query", destination)]);
        normalize_hotels(fetch_json(req).await?)
    }
}

/// Build the provider bundle for sky-scrapper.
#[must_use]
pub fn provider(client: Client, config: SkyScrapperConfig) -> ProviderBundle {
    let config = Arc::new(config);
    let locations = Arc::new(SkyScrapperLocationPort::new(
        client.clone(),
        Arc::clone(&config),
    ));
    let flights = Arc::new(SkyScrapperFlightPort::new(client.clone(), Arc::clone(&config)));
    let hotels = Arc::new(SkyScrapperHotelPort::new(client, config));

    ProviderBundle {
        meta: provider_meta(),
        locations,
        flights,
        hotels: Some(hotels),
    }
}

fn provider_meta() -> ProviderMeta {
    ProviderMeta {
        id: String::from("sky-scrapper"),
        name: String::from("Sky Scrapper"),
    }
}

/// Query string of a `searchFlights` call.
///
/// `returnDate` is only present for round trips.
#[must_use]
pub fn flight_params(query: &FlightQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("originSkyId", query.origin.sky_id.clone()),
        ("destinationSkyId", query.destination.sky_id.clone()),
        ("originEntityId", query.origin.entity_id.clone()),
        ("destinationEntityId", query.destination.entity_id.clone()),
        ("date", query.date_param()),
    ];
    if let Some(return_date) = query.return_date_param() {
        params.push(("returnDate", return_date));
    }
    params.extend([
        ("cabinClass", query.cabin_class.api_token().to_owned()),
        ("adults", query.passengers.adults().to_string()),
        ("children", query.passengers.children().to_string()),
        ("infants", query.passengers.infants().to_string()),
        ("sortBy", "best".to_owned()),
        ("currency", "USD".to_owned()),
        ("market", LOCALE.to_owned()),
        ("countryCode", "US".to_owned()),
    ]);
    params
}

// Small helper to fetch JSON with status handling; shape checks happen in `wire`.
async fn fetch_json(req: RequestBuilder) -> Result<Value, PortError> {
    let resp = req.send().await?;
    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(PortError::RateLimited);
    }
    if !status.is_success() {
        return Err(PortError::Status(status.as_u16()));
    }
    resp.json()
        .await
        .map_err(|err| PortError::Format(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use skyfind_core::model::FlightRouting;
    use skyfind_core::trip::{CabinClass, PassengerKind, Passengers};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn query(return_date: Option<NaiveDate>) -> FlightQuery {
        let mut passengers = Passengers::default();
        passengers.set(PassengerKind::Child, 2);
        FlightQuery {
            origin: FlightRouting {
                sky_id: "LHR".to_owned(),
                entity_id: "95565050".to_owned(),
            },
            destination: FlightRouting {
                sky_id: "JFK".to_owned(),
                entity_id: "95565058".to_owned(),
            },
            date: NaiveDate::from_ymd_opt(2026, 11, 10).expect("valid date"),
            return_date,
            cabin_class: CabinClass::PremiumEconomy,
            passengers,
        }
    }

    fn param<'params>(params: &'params [(&str, String)], name: &str) -> Option<&'params str> {
        params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn one_way_params_omit_return_date() {
        let params = flight_params(&query(None));

        assert_eq!(param(&params, "returnDate"), None, "no return date");
        assert_eq!(param(&params, "date"), Some("2026-11-10"), "iso date");
        assert_eq!(param(&params, "originSkyId"), Some("LHR"), "origin code");
        assert_eq!(param(&params, "destinationEntityId"), Some("95565058"), "destination entity");
        assert_eq!(param(&params, "cabinClass"), Some("premium_economy"), "cabin token");
        assert_eq!(param(&params, "adults"), Some("1"), "adults");
        assert_eq!(param(&params, "children"), Some("2"), "children");
        assert_eq!(param(&params, "infants"), Some("0"), "infants");
        assert_eq!(param(&params, "currency"), Some("USD"), "fixed currency");
    }

    #[test]
    fn round_trip_params_carry_return_date() {
        let params = flight_params(&query(NaiveDate::from_ymd_opt(2026, 11, 17)));
        assert_eq!(param(&params, "returnDate"), Some("2026-11-17"), "return date");
    }

    #[test]
    fn debug_hides_the_key() {
        let config = SkyScrapperConfig::new("secret-value".to_owned());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-value"), "{rendered}");
        assert!(rendered.contains(DEFAULT_HOST), "{rendered}");
    }

    #[test]
    fn bundle_offers_hotels() {
        let bundle = provider(Client::new(), SkyScrapperConfig::new("key".to_owned()));
        assert_eq!(bundle.meta.id, "sky-scrapper", "meta");
        assert!(bundle.hotels.is_some(), "hotel port");
    }

    /// Serve one canned reply on a local port; the handle yields the request head.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind local listener");
        let addr = listener.local_addr().expect("local address");
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = tokio::spawn(async move {
            let (mut socket, _peer) = listener.accept().await.expect("accept");
            let mut buf = vec![0_u8; 4096];
            let read = socket.read(&mut buf).await.expect("read request");
            socket.write_all(response.as_bytes()).await.expect("write reply");
            socket.shutdown().await.expect("close");
            buf.truncate(read);
            String::from_utf8_lossy(&buf).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn http_429_is_rate_limited() {
        let (url, server) = serve_once("429 Too Many Requests", "").await;
        let err = fetch_json(Client::new().get(url)).await.expect_err("429 fails");
        assert!(matches!(err, PortError::RateLimited), "got {err:?}");
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn other_error_statuses_keep_their_code() {
        let (url, server) = serve_once("503 Service Unavailable", "busy").await;
        let err = fetch_json(Client::new().get(url)).await.expect_err("503 fails");
        assert!(matches!(err, PortError::Status(503)), "got {err:?}");
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn success_with_a_non_json_body_is_a_format_error() {
        let (url, server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let err = fetch_json(Client::new().get(url)).await.expect_err("not json");
        assert!(matches!(err, PortError::Format(_)), "got {err:?}");
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn place_lookup_sends_credentials_and_surfaces_rejections() {
        let (url, server) = serve_once("200 OK", r#"{"status":false,"message":"quota"}"#).await;
        let config = SkyScrapperConfig {
            base_url: url,
            api_host: DEFAULT_HOST.to_owned(),
            api_key: "test-key".to_owned(),
        };
        let port = SkyScrapperLocationPort::new(Client::new(), Arc::new(config));

        let err = port.search_places("Lon").await.expect_err("rejected");
        assert!(matches!(err, PortError::Rejected(_)), "got {err:?}");

        let head = server.await.expect("server task").to_lowercase();
        assert!(head.starts_with("get /flights/searchairport?query=lon"), "path: {head}");
        assert!(head.contains("x-rapidapi-key: test-key"), "key header: {head}");
        assert!(head.contains("x-rapidapi-host: sky-scrapper.p.rapidapi.com"), "host header");
    }
}
