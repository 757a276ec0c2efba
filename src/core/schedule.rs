use std::time::{Duration, Instant};

/// Fixed-cadence tick deadlines.
///
/// Each tick's deadline is measured from the moment the tick started, so the
/// time spent refreshing and drawing is absorbed into the interval instead
/// of being added to it.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    next_deadline: Instant,
}

impl TickSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_deadline: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Mark the start of a tick and return its deadline
    pub fn start_tick(&mut self, loop_start: Instant) -> Instant {
        self.next_deadline = loop_start + self.interval;
        self.next_deadline
    }

    /// Time left until the current deadline, zero once it has passed
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_deadline.saturating_duration_since(now)
    }
}
