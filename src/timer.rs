use std::time::{Duration, Instant};

/// A fixed-cadence periodic task, polled by the event loop.
///
/// Dropping the handle cancels it.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next_due: Instant,
}

impl Interval {
    /// First firing is one `period` after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Returns true at most once per call if the deadline has passed, and
    /// re-arms one period after `now`. Missed firings are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.period;
        true
    }
}
