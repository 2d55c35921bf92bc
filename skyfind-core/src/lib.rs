//! Core types and search-session wiring for the skyfind flight search client.

/// Quiescence timer used to throttle location lookups while typing.
pub mod debounce;
/// Location input fields and their lookup state machine.
pub mod field;
/// Search form combining both location fields with the trip configuration.
pub mod form;
/// Domain models and identifiers shared by all providers.
pub mod model;
/// Submission lifecycle for flight and hotel searches.
pub mod orchestrator;
/// Traits describing the provider interfaces.
pub mod ports;
/// Bundle type for plugging a travel-data provider into the session.
pub mod provider;
/// Pure mapping from search status to a displayable view model.
pub mod render;
/// Free-text to place resolution on top of a [`LocationPort`].
pub mod resolver;
/// Monotonic request identifiers used to discard stale responses.
pub mod sequence;
/// Trip type, cabin class, dates and passenger counts.
pub mod trip;

pub use debounce::*;
pub use field::*;
pub use form::*;
pub use model::*;
pub use orchestrator::*;
pub use ports::*;
pub use provider::*;
pub use render::*;
pub use resolver::*;
pub use sequence::*;
pub use trip::*;

#[cfg(test)]
mod testing;
