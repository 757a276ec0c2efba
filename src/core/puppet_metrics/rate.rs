use std::time::Duration;

/// Per-second rate of a monotonically increasing counter sampled once per
/// tick.
#[derive(Debug, Clone, Default)]
pub struct CounterRate {
    previous: Option<f64>,
}

impl CounterRate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current` and return the rate since the previous sample.
    ///
    /// Without a previous sample or a positive elapsed time the rate is 0.
    /// The baseline is replaced on every call, including the first.
    pub fn observe(&mut self, current: f64, elapsed: Option<Duration>) -> f64 {
        let rate = match (self.previous, elapsed) {
            (Some(previous), Some(elapsed)) if !elapsed.is_zero() => {
                (current - previous) / elapsed.as_secs_f64()
            }
            _ => 0.0,
        };
        self.previous = Some(current);
        rate
    }

    pub fn previous(&self) -> Option<f64> {
        self.previous
    }
}
