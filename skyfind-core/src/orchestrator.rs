//! Search submission lifecycle: validation, the provider calls, and stale-result discard.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::form::{SearchForm, Side};
use crate::model::{Hotel, Itinerary, PlaceEntity};
use crate::ports::{FlightPort, FlightQuery, HotelPort, PortError};
use crate::provider::ProviderBundle;
use crate::sequence::{RequestId, RequestSequence};
use crate::trip::ValidationError;

/// Default upper bound for the flight search and the hotel lookup each.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Terminal failure of a submitted search.
pub enum SearchFailure {
    /// Network or HTTP failure.
    #[error("{0}")]
    Transport(String),
    /// Provider answered with HTTP 429.
    #[error("Rate limited")]
    RateLimited,
    /// Response could not be understood.
    #[error("{0}")]
    Format(String),
    /// Provider sent an explicit error payload.
    #[error("{0}")]
    Rejected(String),
    /// Provider did not answer in time.
    #[error("Timed out after {0:?}")]
    TimedOut(Duration),
}

impl From<PortError> for SearchFailure {
    fn from(err: PortError) -> Self {
        match err {
            PortError::RateLimited => SearchFailure::RateLimited,
            PortError::Format(detail) => SearchFailure::Format(detail),
            PortError::Rejected(detail) => SearchFailure::Rejected(detail),
            transport @ (PortError::Transport(_) | PortError::Status(_)) => {
                SearchFailure::Transport(transport.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// What happened to the hotel lookup that follows a successful flight search.
pub enum HotelOutcome {
    /// No hotel port configured.
    NotRequested,
    /// Lookup succeeded, possibly with no hotels.
    Found(Vec<Hotel>),
    /// Lookup failed; the flight results stand regardless.
    Unavailable(String),
}

#[derive(Debug, Clone)]
/// Successful search outcome.
pub struct SearchResults {
    /// Itineraries in provider order.
    pub itineraries: Vec<Itinerary>,
    /// Display title of the destination the search went to.
    pub destination: String,
    /// Dependent hotel lookup.
    pub hotels: HotelOutcome,
}

#[derive(Debug, Clone, Default)]
/// Published state of the search stream.
pub enum SearchStatus {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A submission is in flight.
    Loading,
    /// The latest submission succeeded.
    Success(SearchResults),
    /// The latest submission failed.
    Failed(SearchFailure),
}

impl SearchStatus {
    /// Whether a submission is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchStatus::Loading)
    }
}

/// Check `form` and turn it into a provider query.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found; nothing is sent in that case.
pub fn build_query(form: &SearchForm) -> Result<(FlightQuery, &PlaceEntity), ValidationError> {
    let origin = form
        .field(Side::Origin)
        .resolved()
        .ok_or(ValidationError::MissingOrigin)?;
    let destination = form
        .field(Side::Destination)
        .resolved()
        .ok_or(ValidationError::MissingDestination)?;
    if origin == destination {
        return Err(ValidationError::SameOriginAndDestination);
    }
    let trip = form.trip();
    let (date, return_date) = trip.validate_dates()?;

    let query = FlightQuery {
        origin: origin.routing.clone(),
        destination: destination.routing.clone(),
        date,
        return_date,
        cabin_class: trip.cabin_class(),
        passengers: *trip.passengers(),
    };
    Ok((query, destination))
}

/// One submitted search, ready to run on any task.
pub struct SearchJob {
    id: RequestId,
    query: FlightQuery,
    destination: String,
    flights: Arc<dyn FlightPort>,
    hotels: Option<Arc<dyn HotelPort>>,
    timeout: Duration,
}

#[derive(Debug)]
/// Result of a [`SearchJob`], tagged with the submission it belongs to.
pub struct SearchCompletion {
    /// Submission id.
    pub id: RequestId,
    /// Terminal outcome.
    pub outcome: Result<SearchResults, SearchFailure>,
}

impl SearchJob {
    /// Run the flight search, then the dependent hotel lookup.
    ///
    /// Exactly one flight call is made. A hotel failure is recorded in
    /// [`HotelOutcome::Unavailable`] and never fails the search.
    pub async fn run(self) -> SearchCompletion {
        let outcome = self.execute().await;
        SearchCompletion {
            id: self.id,
            outcome,
        }
    }

    async fn execute(&self) -> Result<SearchResults, SearchFailure> {
        let search = self.flights.search_flights(&self.query);
        let itineraries = tokio::time::timeout(self.timeout, search)
            .await
            .map_err(|_elapsed| SearchFailure::TimedOut(self.timeout))??;
        info!(request = %self.id, count = itineraries.len(), "flight search succeeded");

        let hotels = match &self.hotels {
            None => HotelOutcome::NotRequested,
            Some(port) => self.lookup_hotels(port.as_ref()).await,
        };

        Ok(SearchResults {
            itineraries,
            destination: self.destination.clone(),
            hotels,
        })
    }

    async fn lookup_hotels(&self, port: &dyn HotelPort) -> HotelOutcome {
        match tokio::time::timeout(self.timeout, port.search_hotels(&self.destination)).await {
            Ok(Ok(hotels)) => HotelOutcome::Found(hotels),
            Ok(Err(err)) => {
                warn!(
                    request = %self.id,
                    destination = %self.destination,
                    error = %err,
                    "hotel lookup failed"
                );
                HotelOutcome::Unavailable(err.to_string())
            }
            Err(_elapsed) => {
                warn!(
                    request = %self.id,
                    destination = %self.destination,
                    "hotel lookup timed out"
                );
                HotelOutcome::Unavailable(format!("Timed out after {:?}", self.timeout))
            }
        }
    }
}

/// Owns the search stream: issues submissions and publishes their status.
pub struct SearchOrchestrator {
    flights: Arc<dyn FlightPort>,
    hotels: Option<Arc<dyn HotelPort>>,
    submissions: RequestSequence,
    timeout: Duration,
    status: watch::Sender<SearchStatus>,
}

impl SearchOrchestrator {
    /// Create an orchestrator over the ports of `bundle`.
    #[must_use]
    pub fn new(bundle: &ProviderBundle) -> Self {
        Self::from_ports(Arc::clone(&bundle.flights), bundle.hotels.clone())
    }

    /// Create an orchestrator over explicit ports.
    #[must_use]
    pub fn from_ports(flights: Arc<dyn FlightPort>, hotels: Option<Arc<dyn HotelPort>>) -> Self {
        let (status, _receiver) = watch::channel(SearchStatus::Idle);
        Self {
            flights,
            hotels,
            submissions: RequestSequence::new(),
            timeout: DEFAULT_SEARCH_TIMEOUT,
            status,
        }
    }

    /// Override the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Watch status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchStatus> {
        self.status.subscribe()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> watch::Ref<'_, SearchStatus> {
        self.status.borrow()
    }

    /// Validate `form`, publish `Loading`, and hand back the job to run.
    ///
    /// Any submission still in flight is superseded.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] without touching the published status.
    pub fn prepare(&mut self, form: &SearchForm) -> Result<SearchJob, ValidationError> {
        let (query, destination) = build_query(form)?;
        let id = self.submissions.issue();
        info!(
            request = %id,
            origin = %query.origin.sky_id,
            destination = %query.destination.sky_id,
            date = %query.date_param(),
            "submitting flight search"
        );
        let job = SearchJob {
            id,
            query,
            destination: destination.title.clone(),
            flights: Arc::clone(&self.flights),
            hotels: self.hotels.clone(),
            timeout: self.timeout,
        };
        self.status.send_replace(SearchStatus::Loading);
        Ok(job)
    }

    /// Publish the outcome of a finished job.
    ///
    /// Returns `false` and publishes nothing when a newer submission has started since.
    pub fn complete(&mut self, completion: SearchCompletion) -> bool {
        if !self.submissions.is_latest(completion.id) {
            debug!(request = %completion.id, "discarding stale search result");
            return false;
        }
        let status = match completion.outcome {
            Ok(results) => SearchStatus::Success(results),
            Err(failure) => {
                warn!(request = %completion.id, error = %failure, "flight search failed");
                SearchStatus::Failed(failure)
            }
        };
        self.status.send_replace(status);
        true
    }

    /// Validate, run and publish in one go.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the form is incomplete; no call is made.
    pub async fn submit(&mut self, form: &SearchForm) -> Result<bool, ValidationError> {
        let job = self.prepare(form)?;
        let completion = job.run().await;
        Ok(self.complete(completion))
    }
}
