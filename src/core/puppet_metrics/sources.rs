//! The metric families shown on the dashboard.

use std::sync::Arc;
use std::time::Duration;

use super::client::{Fetch, MetricQuery};
use super::rate::CounterRate;
use super::reading::Reading;
use super::{non_negative, MetricSource};
use crate::error::Result;

const MEMORY_PREFIX: &str = "puppetserver:name=puppetlabs.localhost.memory";
const JRUBY_PREFIX: &str = "puppetserver:name=puppetlabs.localhost.jruby";

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Implements `MetricSource` for a family by delegating to its `reading`.
/// `refresh` stays with the family so it can derive values after a fetch.
macro_rules! delegate_reading {
    () => {
        fn name(&self) -> &str {
            self.reading.name()
        }

        fn get(&self, path: &[&str]) -> Option<f64> {
            self.reading.get(path)
        }

        fn elapsed_since_last_sample(&self) -> Option<Duration> {
            self.reading.elapsed_since_last_sample()
        }
    };
}

/// `java.lang:type=OperatingSystem`
pub struct OperatingSystemMetrics {
    reading: Reading,
    cpu_time: CounterRate,
    cpu_time_rate: f64,
}

impl OperatingSystemMetrics {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            reading: Reading::new(
                "operating system",
                fetcher,
                MetricQuery::by_type("java.lang", "OperatingSystem"),
            ),
            cpu_time: CounterRate::new(),
            cpu_time_rate: 0.0,
        }
    }

    pub fn available_processors(&self) -> f64 {
        non_negative(self.get(&["AvailableProcessors"]))
    }

    pub fn physical_memory_size(&self) -> f64 {
        non_negative(self.get(&["TotalPhysicalMemorySize"]))
    }

    pub fn system_load_average(&self) -> f64 {
        non_negative(self.get(&["SystemLoadAverage"]))
    }

    /// CPU seconds consumed by the server per wall-clock second
    pub fn process_cpu_time(&self) -> f64 {
        non_negative(Some(self.cpu_time_rate))
    }
}

impl MetricSource for OperatingSystemMetrics {
    delegate_reading!();

    fn refresh(&mut self) -> Result<()> {
        self.reading.refresh()?;

        self.cpu_time_rate = match self.reading.get(&["ProcessCpuTime"]) {
            Some(nanos) => self.cpu_time.observe(
                nanos / NANOS_PER_SEC,
                self.reading.elapsed_since_last_sample(),
            ),
            None => 0.0,
        };
        Ok(())
    }
}

/// `puppetserver:name=puppetlabs.localhost.memory.*`
pub struct MemoryMetrics {
    reading: Reading,
}

impl MemoryMetrics {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            reading: Reading::new(
                "memory",
                fetcher,
                MetricQuery::by_name("puppetserver", "puppetlabs.localhost.memory.*"),
            ),
        }
    }

    fn gauge(&self, metric: &str) -> Option<f64> {
        let key = format!("{}.{}", MEMORY_PREFIX, metric);
        self.get(&[key.as_str(), "Value"])
    }

    pub fn heap_memory_max(&self) -> f64 {
        non_negative(self.gauge("heap.max"))
    }

    pub fn heap_memory_used(&self) -> f64 {
        non_negative(self.gauge("heap.used"))
    }
}

impl MetricSource for MemoryMetrics {
    delegate_reading!();

    fn refresh(&mut self) -> Result<()> {
        self.reading.refresh()
    }
}

/// `java.lang:type=Threading`
pub struct ThreadingMetrics {
    reading: Reading,
}

impl ThreadingMetrics {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            reading: Reading::new(
                "threading",
                fetcher,
                MetricQuery::by_type("java.lang", "Threading"),
            ),
        }
    }

    pub fn thread_count(&self) -> f64 {
        non_negative(self.get(&["ThreadCount"]))
    }

    pub fn peak_thread_count(&self) -> f64 {
        non_negative(self.get(&["PeakThreadCount"]))
    }

    pub fn daemon_thread_count(&self) -> f64 {
        non_negative(self.get(&["DaemonThreadCount"]))
    }
}

impl MetricSource for ThreadingMetrics {
    delegate_reading!();

    fn refresh(&mut self) -> Result<()> {
        self.reading.refresh()
    }
}

/// `puppetserver:name=puppetlabs.localhost.jruby.*`, the pool of JRuby
/// interpreters serving catalog compilations.
pub struct JRubyMetrics {
    reading: Reading,
}

impl JRubyMetrics {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            reading: Reading::new(
                "jruby",
                fetcher,
                MetricQuery::by_name("puppetserver", "puppetlabs.localhost.jruby.*"),
            ),
        }
    }

    fn attribute(&self, metric: &str, attribute: &str) -> Option<f64> {
        let key = format!("{}.{}", JRUBY_PREFIX, metric);
        self.get(&[key.as_str(), attribute])
    }

    fn num_rubies_raw(&self) -> Option<f64> {
        self.attribute("num-jrubies", "Value")
    }

    pub fn num_rubies(&self) -> f64 {
        non_negative(self.num_rubies_raw())
    }

    pub fn used_rubies(&self) -> f64 {
        let free = self.attribute("num-free-jrubies", "Value");
        non_negative(self.num_rubies_raw().zip(free).map(|(n, f)| n - f))
    }

    pub fn mean_used_rubies(&self) -> f64 {
        let free = self.attribute("free-jrubies-histo", "Mean");
        non_negative(self.num_rubies_raw().zip(free).map(|(n, f)| n - f))
    }

    pub fn request_rate_mean(&self) -> f64 {
        non_negative(self.attribute("borrow-timer", "MeanRate"))
    }

    pub fn request_rate_1min(&self) -> f64 {
        non_negative(self.attribute("borrow-timer", "OneMinuteRate"))
    }

    pub fn queue_limit_rate_mean(&self) -> f64 {
        non_negative(self.attribute("queue-limit-hit-meter", "MeanRate"))
    }

    pub fn queue_limit_rate_1min(&self) -> f64 {
        non_negative(self.attribute("queue-limit-hit-meter", "OneMinuteRate"))
    }

    pub fn borrow_time_mean(&self) -> f64 {
        non_negative(self.attribute("borrow-timer", "Mean"))
    }

    pub fn wait_time_mean(&self) -> f64 {
        non_negative(self.attribute("wait-timer", "Mean"))
    }
}

impl MetricSource for JRubyMetrics {
    delegate_reading!();

    fn refresh(&mut self) -> Result<()> {
        self.reading.refresh()
    }
}
