use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::core::config::{ServerConfig, DEFAULT_INTERVAL_SECS};
use crate::core::puppet_metrics::{Fetch, MetricSet, MetricsClient};
use crate::core::run_loop::RunLoop;
use crate::core::shutdown::{install_signal_bridge, StopSignal};
use crate::error::Result;

use super::dashboard::Dashboard;
use super::event_handler::spawn_key_watcher;
use super::terminal::{install_panic_hook, TerminalSession};

/// Dashboard state: the metric sources and the screen they are drawn on
pub struct DashboardApp {
    metrics: MetricSet,
    dashboard: Dashboard,
}

impl DashboardApp {
    pub fn new(server: &str, fetcher: Arc<dyn Fetch>) -> Result<Self> {
        Ok(Self {
            metrics: MetricSet::new(fetcher),
            dashboard: Dashboard::new(server)?,
        })
    }

    /// Read the baseline samples and size the gauges from them. Failing
    /// here is fatal: there is no dashboard to keep alive yet.
    pub fn setup(&mut self) -> Result<()> {
        let baseline = self.metrics.establish()?;
        log::info!(
            "Baseline: {} processors, {} bytes max heap, {} JRubies",
            baseline.processors,
            baseline.heap_max,
            baseline.num_rubies
        );
        self.dashboard.seed_limits(&baseline);
        self.dashboard.set_clock(&Local::now());
        Ok(())
    }

    /// One refresh: fetch every source, then draw all values from that pass.
    ///
    /// A source that fails to refresh keeps its previous values and the
    /// failure is shown on the status line. Errors that are not fetch
    /// failures end the dashboard.
    pub fn tick(&mut self, now: DateTime<Local>) -> Result<()> {
        let mut status = None;
        for failure in self.metrics.refresh_all() {
            if !failure.error.is_fetch() {
                return Err(failure.error);
            }
            log::warn!(
                "Refreshing {} metrics failed: {}",
                failure.source,
                failure.error
            );
            status.get_or_insert_with(|| {
                format!(
                    "{}: {} (showing previous values)",
                    failure.source, failure.error
                )
            });
        }

        self.dashboard.set_status(status.as_deref());
        self.dashboard.update(&self.metrics.snapshot());
        self.dashboard.set_clock(&now);
        Ok(())
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn metrics(&self) -> &MetricSet {
        &self.metrics
    }
}

/// Configuration for the dashboard run
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub interval: Duration,
    /// Silence logging while the dashboard owns the terminal
    pub mute_logs: bool,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            mute_logs: true,
        }
    }
}

/// Run the dashboard until a termination signal or quit key arrives
pub fn run_dashboard(config: &ServerConfig, options: &DashboardOptions) -> Result<()> {
    let client = MetricsClient::new(config)?;
    log::info!("Reading metrics from {}", client.base_url());

    let mut app = DashboardApp::new(&config.server, Arc::new(client))?;
    app.setup()?;

    let stop = StopSignal::new();
    install_signal_bridge(&stop)?;
    install_panic_hook();

    let mut session = TerminalSession::enter(options.mute_logs)?;
    let watcher = spawn_key_watcher(stop.clone())?;

    // Initial screen before the first refresh
    let mut result = session.draw(app.dashboard());

    if result.is_ok() {
        let mut run_loop = RunLoop::new(options.interval, stop.clone());
        result = run_loop.run(|_| {
            app.tick(Local::now())?;
            session.draw(app.dashboard())
        });
    }

    stop.trigger();
    if watcher.join().is_err() {
        log::error!("Key watcher thread panicked");
    }
    drop(session);

    result
}
