//! Search form: origin and destination fields plus the trip configuration.

use crate::field::{LocationField, LookupTicket};
use crate::model::PlaceEntity;
use crate::sequence::{RequestId, RequestSequence};
use crate::trip::TripConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which end of the journey a field describes.
pub enum Side {
    /// Where the trip starts.
    Origin,
    /// Where the trip goes.
    Destination,
}

#[derive(Debug, Default)]
/// Everything the user fills in before submitting a search.
///
/// Both fields draw lookup ids from one sequence, so an id identifies exactly one
/// field and completions can be routed by id alone.
pub struct SearchForm {
    origin: LocationField,
    destination: LocationField,
    trip: TripConfig,
    lookups: RequestSequence,
}

impl SearchForm {
    /// Empty form with the default trip configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty form starting from `trip`.
    #[must_use]
    pub fn with_trip(trip: TripConfig) -> Self {
        Self {
            trip,
            ..Self::default()
        }
    }

    /// Field for `side`.
    #[must_use]
    pub fn field(&self, side: Side) -> &LocationField {
        match side {
            Side::Origin => &self.origin,
            Side::Destination => &self.destination,
        }
    }

    fn field_mut(&mut self, side: Side) -> &mut LocationField {
        match side {
            Side::Origin => &mut self.origin,
            Side::Destination => &mut self.destination,
        }
    }

    /// Trip configuration.
    #[must_use]
    pub fn trip(&self) -> &TripConfig {
        &self.trip
    }

    /// Mutable trip configuration.
    pub fn trip_mut(&mut self) -> &mut TripConfig {
        &mut self.trip
    }

    fn split(&mut self, side: Side) -> (&mut LocationField, &mut RequestSequence) {
        let field = match side {
            Side::Origin => &mut self.origin,
            Side::Destination => &mut self.destination,
        };
        (field, &mut self.lookups)
    }

    /// Replace the text of one field.
    pub fn edit(&mut self, side: Side, text: String) -> Option<LookupTicket> {
        let (field, lookups) = self.split(side);
        field.edit(text, lookups)
    }

    /// Type one character into a field.
    pub fn push_char(&mut self, side: Side, character: char) -> Option<LookupTicket> {
        let (field, lookups) = self.split(side);
        field.push_char(character, lookups)
    }

    /// Delete the last character of a field.
    pub fn pop_char(&mut self, side: Side) -> Option<LookupTicket> {
        let (field, lookups) = self.split(side);
        field.pop_char(lookups)
    }

    /// Whether lookup `id` is still awaited by one of the fields.
    #[must_use]
    pub fn is_pending(&self, id: RequestId) -> bool {
        self.side_awaiting(id).is_some()
    }

    fn side_awaiting(&self, id: RequestId) -> Option<Side> {
        [Side::Origin, Side::Destination]
            .into_iter()
            .find(|side| self.field(*side).pending_request() == Some(id))
    }

    /// Deliver lookup results to whichever field is waiting on `id`.
    ///
    /// Returns the side that accepted them, or `None` when the lookup was superseded.
    pub fn apply_lookup(&mut self, id: RequestId, candidates: Vec<PlaceEntity>) -> Option<Side> {
        let side = self.side_awaiting(id)?;
        self.field_mut(side).apply_lookup(id, candidates);
        Some(side)
    }

    /// Give up on lookup `id`.
    pub fn expire_lookup(&mut self, id: RequestId) -> Option<Side> {
        self.apply_lookup(id, Vec::new())
    }

    /// Commit the highlighted suggestion of a field.
    pub fn select_highlighted(&mut self, side: Side) -> Option<&PlaceEntity> {
        self.field_mut(side).select_highlighted()
    }

    /// Move the suggestion highlight of a field.
    pub fn highlight(&mut self, side: Side, down: bool) {
        let field = self.field_mut(side);
        if down {
            field.highlight_next();
        } else {
            field.highlight_previous();
        }
    }

    /// Drop suggestions of a field.
    pub fn dismiss(&mut self, side: Side) {
        self.field_mut(side).dismiss();
    }

    /// Exchange origin and destination, text, selection and pending lookup included.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
    }
}
