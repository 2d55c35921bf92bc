//! Location input field: free text on its way to becoming a [`PlaceEntity`].

use crate::model::PlaceEntity;
use crate::resolver::is_resolvable_query;
use crate::sequence::{RequestId, RequestSequence};

#[derive(Debug, Clone, PartialEq)]
/// Lifecycle of one location field.
pub enum FieldState {
    /// Text that is not being looked up.
    Idle {
        /// Current text.
        text: String,
    },
    /// A lookup for `text` is in flight.
    Searching {
        /// Current text.
        text: String,
        /// The only lookup whose completion this field accepts.
        request: RequestId,
    },
    /// Candidates for `text` are ready to pick from.
    SuggestionsShown {
        /// Current text.
        text: String,
        /// Candidates in provider order.
        candidates: Vec<PlaceEntity>,
        /// Highlighted candidate.
        highlighted: usize,
    },
    /// The user picked a place.
    Resolved {
        /// The selected place.
        entity: PlaceEntity,
    },
}

impl Default for FieldState {
    fn default() -> Self {
        FieldState::Idle {
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Instruction to look up `query` and report back under `id`.
pub struct LookupTicket {
    /// Request id to hand back with the result.
    pub id: RequestId,
    /// Text to resolve.
    pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// One side (origin or destination) of the journey.
pub struct LocationField {
    state: FieldState,
}

impl LocationField {
    /// Empty idle field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    /// Text currently shown in the field.
    #[must_use]
    pub fn text(&self) -> &str {
        match &self.state {
            FieldState::Idle { text }
            | FieldState::Searching { text, .. }
            | FieldState::SuggestionsShown { text, .. } => text,
            FieldState::Resolved { entity } => &entity.suggestion_title,
        }
    }

    /// Selected place, if the field is resolved.
    #[must_use]
    pub fn resolved(&self) -> Option<&PlaceEntity> {
        match &self.state {
            FieldState::Resolved { entity } => Some(entity),
            _ => None,
        }
    }

    /// Whether a lookup is in flight.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        matches!(self.state, FieldState::Searching { .. })
    }

    /// Lookup this field is waiting on.
    #[must_use]
    pub fn pending_request(&self) -> Option<RequestId> {
        match &self.state {
            FieldState::Searching { request, .. } => Some(*request),
            _ => None,
        }
    }

    /// Candidates on display, empty outside `SuggestionsShown`.
    #[must_use]
    pub fn candidates(&self) -> &[PlaceEntity] {
        match &self.state {
            FieldState::SuggestionsShown { candidates, .. } => candidates,
            _ => &[],
        }
    }

    /// Index of the highlighted candidate.
    #[must_use]
    pub fn highlighted(&self) -> Option<usize> {
        match &self.state {
            FieldState::SuggestionsShown { highlighted, .. } => Some(*highlighted),
            _ => None,
        }
    }

    /// Replace the text.
    ///
    /// Any previous selection is dropped. Returns a ticket when the new text is long
    /// enough to look up; otherwise the field goes idle and no lookup is needed.
    pub fn edit(&mut self, text: String, sequence: &mut RequestSequence) -> Option<LookupTicket> {
        if !is_resolvable_query(&text) {
            self.state = FieldState::Idle { text };
            return None;
        }
        let id = sequence.issue();
        let ticket = LookupTicket {
            id,
            query: text.trim().to_owned(),
        };
        self.state = FieldState::Searching { text, request: id };
        Some(ticket)
    }

    /// Append a character to the current text.
    pub fn push_char(
        &mut self,
        character: char,
        sequence: &mut RequestSequence,
    ) -> Option<LookupTicket> {
        let mut text = self.text().to_owned();
        text.push(character);
        self.edit(text, sequence)
    }

    /// Remove the last character of the current text.
    pub fn pop_char(&mut self, sequence: &mut RequestSequence) -> Option<LookupTicket> {
        let mut text = self.text().to_owned();
        text.pop();
        self.edit(text, sequence)
    }

    /// Deliver lookup results for request `id`.
    ///
    /// Returns `false` and leaves the field untouched when `id` is not the lookup the
    /// field is waiting on.
    pub fn apply_lookup(&mut self, id: RequestId, candidates: Vec<PlaceEntity>) -> bool {
        if self.pending_request() != Some(id) {
            return false;
        }
        let text = self.take_text();
        self.state = if candidates.is_empty() {
            FieldState::Idle { text }
        } else {
            FieldState::SuggestionsShown {
                text,
                candidates,
                highlighted: 0,
            }
        };
        true
    }

    /// Abandon lookup `id`, e.g. after a timeout. Returns `false` if it was not pending.
    pub fn expire(&mut self, id: RequestId) -> bool {
        self.apply_lookup(id, Vec::new())
    }

    /// Move the highlight down, stopping at the last candidate.
    pub fn highlight_next(&mut self) {
        if let FieldState::SuggestionsShown {
            candidates,
            highlighted,
            ..
        } = &mut self.state
            && *highlighted + 1 < candidates.len()
        {
            *highlighted += 1;
        }
    }

    /// Move the highlight up, stopping at the first candidate.
    pub fn highlight_previous(&mut self) {
        if let FieldState::SuggestionsShown { highlighted, .. } = &mut self.state {
            *highlighted = highlighted.saturating_sub(1);
        }
    }

    /// Commit candidate `index`. Returns the selected place.
    pub fn select(&mut self, index: usize) -> Option<&PlaceEntity> {
        let entity = self.candidates().get(index).cloned()?;
        self.state = FieldState::Resolved { entity };
        self.resolved()
    }

    /// Commit the highlighted candidate.
    pub fn select_highlighted(&mut self) -> Option<&PlaceEntity> {
        let index = self.highlighted()?;
        self.select(index)
    }

    /// Drop suggestions or a pending lookup while keeping the text.
    pub fn dismiss(&mut self) {
        if matches!(
            self.state,
            FieldState::Searching { .. } | FieldState::SuggestionsShown { .. }
        ) {
            let text = self.take_text();
            self.state = FieldState::Idle { text };
        }
    }

    fn take_text(&mut self) -> String {
        match std::mem::take(&mut self.state) {
            FieldState::Idle { text }
            | FieldState::Searching { text, .. }
            | FieldState::SuggestionsShown { text, .. } => text,
            FieldState::Resolved { entity } => entity.suggestion_title,
        }
    }
}
