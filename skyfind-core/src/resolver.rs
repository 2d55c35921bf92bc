//! Free-text place resolution with a minimum query length and a timeout.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::model::PlaceEntity;
use crate::ports::{LocationPort, PortError};

/// Queries shorter than this many characters are never sent.
pub const MIN_QUERY_CHARS: usize = 2;

/// Default upper bound for a single lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(thiserror::Error, Debug)]
/// Suggestion lookup failed.
pub enum LookupError {
    /// Provider call failed.
    #[error(transparent)]
    Port(#[from] PortError),
    /// Provider did not answer in time.
    #[error("Lookup timed out after {0:?}")]
    TimedOut(Duration),
}

/// Whether `text` is long enough to be worth looking up.
#[must_use]
pub fn is_resolvable_query(text: &str) -> bool {
    text.trim().chars().count() >= MIN_QUERY_CHARS
}

#[derive(Clone)]
/// Resolves free text into candidate places through a [`LocationPort`].
pub struct LocationResolver {
    port: Arc<dyn LocationPort>,
    timeout: Duration,
}

impl LocationResolver {
    /// Create a resolver with the default timeout.
    #[must_use]
    pub fn new(port: Arc<dyn LocationPort>) -> Self {
        Self {
            port,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Override the per-lookup timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve `query`, surfacing failures.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] when the provider fails or times out.
    pub async fn try_resolve(&self, query: &str) -> Result<Vec<PlaceEntity>, LookupError> {
        let query = query.trim();
        if !is_resolvable_query(query) {
            return Ok(Vec::new());
        }
        let places = tokio::time::timeout(self.timeout, self.port.search_places(query))
            .await
            .map_err(|_elapsed| LookupError::TimedOut(self.timeout))??;
        debug!(query, count = places.len(), "resolved places");
        Ok(places)
    }

    /// Resolve `query`, degrading any failure to an empty list.
    pub async fn resolve(&self, query: &str) -> Vec<PlaceEntity> {
        match self.try_resolve(query).await {
            Ok(places) => places,
            Err(err) => {
                warn!(query, error = %err, "place lookup failed");
                Vec::new()
            }
        }
    }
}
