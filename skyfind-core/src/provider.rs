//! Bundle of ports implementing one travel-data provider.

use std::sync::Arc;

use crate::ports::{FlightPort, HotelPort, LocationPort};

#[derive(Debug, Clone)]
/// Static metadata describing a provider.
pub struct ProviderMeta {
    /// Short identifier used in logs.
    pub id: String,
    /// Human-friendly name.
    pub name: String,
}

/// Collection of ports that together implement a provider.
pub struct ProviderBundle {
    /// Static metadata.
    pub meta: ProviderMeta,
    /// Place lookup implementation.
    pub locations: Arc<dyn LocationPort>,
    /// Flight search implementation.
    pub flights: Arc<dyn FlightPort>,
    /// Hotel lookup implementation, if the provider offers one.
    pub hotels: Option<Arc<dyn HotelPort>>,
}

impl ProviderBundle {
    /// Same bundle without hotel lookups.
    #[must_use]
    pub fn without_hotels(mut self) -> Self {
        self.hotels = None;
        self
    }
}
