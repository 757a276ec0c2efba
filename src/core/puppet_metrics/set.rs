use std::sync::Arc;

use super::client::Fetch;
use super::sources::{JRubyMetrics, MemoryMetrics, OperatingSystemMetrics, ThreadingMetrics};
use super::MetricSource;
use crate::error::{MetricsError, Result};

/// One-time values used to size the gauges before the first tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Baseline {
    pub processors: f64,
    pub heap_max: f64,
    pub num_rubies: f64,
}

/// Every value the dashboard shows, taken after all sources of one tick
/// have been refreshed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub thread_count: f64,
    pub daemon_thread_count: f64,
    pub peak_thread_count: f64,
    pub load_average: f64,
    pub processors: f64,
    pub physical_memory: f64,
    pub cpu_time_rate: f64,
    pub heap_used: f64,
    pub request_rate_mean: f64,
    pub request_rate_1min: f64,
    pub queue_limit_rate_mean: f64,
    pub queue_limit_rate_1min: f64,
    pub mean_used_rubies: f64,
    pub used_rubies: f64,
    pub borrow_time_mean: f64,
    pub wait_time_mean: f64,
}

/// A failed refresh of one source during a tick
#[derive(Debug)]
pub struct SourceFailure {
    pub source: String,
    pub error: MetricsError,
}

/// All metric families read from one server
pub struct MetricSet {
    pub os: OperatingSystemMetrics,
    pub memory: MemoryMetrics,
    pub threading: ThreadingMetrics,
    pub jruby: JRubyMetrics,
}

impl MetricSet {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            os: OperatingSystemMetrics::new(fetcher.clone()),
            memory: MemoryMetrics::new(fetcher.clone()),
            threading: ThreadingMetrics::new(fetcher.clone()),
            jruby: JRubyMetrics::new(fetcher),
        }
    }

    fn sources_mut(&mut self) -> [&mut dyn MetricSource; 4] {
        [
            &mut self.os,
            &mut self.memory,
            &mut self.threading,
            &mut self.jruby,
        ]
    }

    /// First fetch of every source. Any failure is fatal here since the
    /// gauges cannot be sized without a baseline.
    pub fn establish(&mut self) -> Result<Baseline> {
        for source in self.sources_mut() {
            source.refresh().map_err(|e| {
                MetricsError::config(format!(
                    "Cannot read {} metrics: {}",
                    source.name(),
                    e
                ))
            })?;
        }
        Ok(self.baseline())
    }

    /// Refresh every source in turn. A failing source keeps its previous
    /// values; its error is returned so the caller can report it.
    pub fn refresh_all(&mut self) -> Vec<SourceFailure> {
        let mut failures = Vec::new();
        for source in self.sources_mut() {
            if let Err(error) = source.refresh() {
                failures.push(SourceFailure {
                    source: source.name().to_string(),
                    error,
                });
            }
        }
        failures
    }

    pub fn baseline(&self) -> Baseline {
        Baseline {
            processors: self.os.available_processors(),
            heap_max: self.memory.heap_memory_max(),
            num_rubies: self.jruby.num_rubies(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            thread_count: self.threading.thread_count(),
            daemon_thread_count: self.threading.daemon_thread_count(),
            peak_thread_count: self.threading.peak_thread_count(),
            load_average: self.os.system_load_average(),
            processors: self.os.available_processors(),
            physical_memory: self.os.physical_memory_size(),
            cpu_time_rate: self.os.process_cpu_time(),
            heap_used: self.memory.heap_memory_used(),
            request_rate_mean: self.jruby.request_rate_mean(),
            request_rate_1min: self.jruby.request_rate_1min(),
            queue_limit_rate_mean: self.jruby.queue_limit_rate_mean(),
            queue_limit_rate_1min: self.jruby.queue_limit_rate_1min(),
            mean_used_rubies: self.jruby.mean_used_rubies(),
            used_rubies: self.jruby.used_rubies(),
            borrow_time_mean: self.jruby.borrow_time_mean(),
            wait_time_mean: self.jruby.wait_time_mean(),
        }
    }
}
