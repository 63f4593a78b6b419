//! Rate limiting for pointer handlers
//!
//! The caller passes the current instant into every call, so the debouncer
//! owns no timer of its own; the host's event loop polls it.

use std::time::{Duration, Instant};

/// Which edge of a burst of calls fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceEdge {
    /// Fire on the first call of a burst, ignore the rest
    Leading,
    /// Fire once the burst has been quiet for the wait period, with the last value
    Trailing,
}

/// Debouncer carrying the most recent call's payload
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    wait: Duration,
    edge: DebounceEdge,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration, edge: DebounceEdge) -> Self {
        Self {
            wait,
            edge,
            deadline: None,
            pending: None,
        }
    }

    pub fn leading(wait: Duration) -> Self {
        Self::new(wait, DebounceEdge::Leading)
    }

    pub fn trailing(wait: Duration) -> Self {
        Self::new(wait, DebounceEdge::Trailing)
    }

    /// Register a call at `now`.
    ///
    /// Every call restarts the wait period. A leading debouncer returns the
    /// value when no period was running; a trailing one stores it for
    /// [`Debouncer::poll`].
    pub fn call(&mut self, now: Instant, value: T) -> Option<T> {
        let running = self.is_running(now);
        self.deadline = Some(now + self.wait);

        match self.edge {
            DebounceEdge::Leading => (!running).then_some(value),
            DebounceEdge::Trailing => {
                self.pending = Some(value);
                None
            }
        }
    }

    /// Expire the wait period if it has elapsed at `now`.
    ///
    /// Returns the stored value for a trailing debouncer.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Drop the running period and any stored value
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }

    /// Whether a trailing value is waiting to fire
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn is_running(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_millis(16);

    #[test]
    fn test_trailing_fires_last_value_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::trailing(WAIT);

        assert_eq!(debouncer.call(start, 1), None);
        assert_eq!(debouncer.call(start + Duration::from_millis(5), 2), None);
        assert_eq!(debouncer.call(start + Duration::from_millis(10), 3), None);

        // Deadline moved with the last call
        assert_eq!(debouncer.poll(start + Duration::from_millis(20)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(26)), Some(3));
        assert_eq!(debouncer.poll(start + Duration::from_millis(40)), None);
    }

    #[test]
    fn test_leading_fires_first_call_only() {
        let start = Instant::now();
        let mut debouncer = Debouncer::leading(WAIT);

        assert_eq!(debouncer.call(start, "a"), Some("a"));
        assert_eq!(debouncer.call(start + Duration::from_millis(8), "b"), None);
        // Still inside the window restarted by "b"
        assert_eq!(debouncer.call(start + Duration::from_millis(20), "c"), None);
        // Quiet long enough
        assert_eq!(debouncer.call(start + Duration::from_millis(60), "d"), Some("d"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_cancel_drops_pending_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::trailing(WAIT);
        debouncer.call(start, 1);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + WAIT), None);
    }
}
