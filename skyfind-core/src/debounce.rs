//! Quiescence timer for throttling lookups while the user is typing.

use std::time::{Duration, Instant};

/// Default quiescence window before a lookup fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
/// Holds the latest scheduled item until the input has been quiet for a full window.
///
/// The clock is passed in, so the caller decides what "now" means.
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiescence window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Schedule `item`, replacing anything still pending and restarting the window.
    pub fn schedule(&mut self, item: T, now: Instant) {
        self.pending = Some((now + self.window, item));
    }

    /// Take the pending item if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending.take() {
            Some((deadline, item)) if now >= deadline => Some(item),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Drop whatever is pending.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Deadline of the pending item, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
