//! Request identifiers for last-request-wins ordering.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identifier of one issued request within a [`RequestSequence`].
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
/// Monotonic source of [`RequestId`]s.
///
/// Every call to [`RequestSequence::issue`] returns an id greater than all earlier ones,
/// so a holder only has to remember the latest id to recognise stale completions.
pub struct RequestSequence {
    last: u64,
}

impl RequestSequence {
    /// Create a sequence that has not issued anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id.
    pub fn issue(&mut self) -> RequestId {
        self.last = self.last.saturating_add(1);
        RequestId(self.last)
    }

    /// Most recently issued id, if any.
    #[must_use]
    pub fn latest(&self) -> Option<RequestId> {
        (self.last > 0).then_some(RequestId(self.last))
    }

    /// Whether `id` is the most recently issued id.
    #[must_use]
    pub fn is_latest(&self, id: RequestId) -> bool {
        self.latest() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_monotonically() {
        let mut sequence = RequestSequence::new();
        assert_eq!(sequence.latest(), None, "fresh sequence has no id");

        let first = sequence.issue();
        let second = sequence.issue();

        assert!(second > first, "later id must compare greater");
        assert!(sequence.is_latest(second), "second is latest");
        assert!(!sequence.is_latest(first), "first was superseded");
    }
}
