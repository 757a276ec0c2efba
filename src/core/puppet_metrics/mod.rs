//! Metric sources backed by the Puppetserver metrics API.
//!
//! Every family (operating system, memory, threading, JRuby pool) is its own
//! struct built on a shared [`Reading`], which does the fetching and the key
//! digging. The HTTP side sits behind the [`Fetch`] trait.

mod client;
mod rate;
mod reading;
mod set;
pub mod sources;

pub use client::{check_document_status, Fetch, MetricQuery, MetricsClient, USER_AGENT};
pub use rate::CounterRate;
pub use reading::Reading;
pub use set::{Baseline, MetricSet, Snapshot, SourceFailure};
pub use sources::{JRubyMetrics, MemoryMetrics, OperatingSystemMetrics, ThreadingMetrics};

use std::time::Duration;

use crate::error::Result;

/// Anything that exposes named numeric readings and can be refreshed.
pub trait MetricSource {
    /// Short name used in log and status messages
    fn name(&self) -> &str;

    /// Fetch new data. On failure the previous data is kept.
    fn refresh(&mut self) -> Result<()>;

    /// Dig into the nested reading by successive key lookups. Absent if any
    /// key along the path is missing or the leaf is not a number.
    fn get(&self, path: &[&str]) -> Option<f64>;

    /// Server-side time between the two most recent samples
    fn elapsed_since_last_sample(&self) -> Option<Duration>;
}

/// Substitute the display default for readings the widgets must not see:
/// absent, negative, or non-finite values all become zero.
pub fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_defaults() {
        assert_eq!(non_negative(None), 0.0);
        assert_eq!(non_negative(Some(-3.0)), 0.0);
        assert_eq!(non_negative(Some(f64::NAN)), 0.0);
        assert_eq!(non_negative(Some(2.5)), 2.5);
    }
}
