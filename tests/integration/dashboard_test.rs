// Integration tests driving the dashboard through a simulated metrics API

use parking_lot::Mutex;
use puppetserver_metrics::core::puppet_metrics::{Fetch, MetricQuery, MetricSet};
use puppetserver_metrics::ui::metrics_tui::{DashboardApp, Half};
use puppetserver_metrics::{MetricsError, Result};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use serde_json::{json, Value};
use std::sync::Arc;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Healthy,
    Unreachable,
    Broken,
}

/// Answers every query like a Puppetserver would. Each sample advances the
/// server clock by 3 seconds and the process CPU time by 6 seconds.
struct SimulatedServer {
    state: Mutex<(Mode, u64)>,
}

impl SimulatedServer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new((Mode::Healthy, 0)),
        })
    }

    fn set_mode(&self, mode: Mode) {
        self.state.lock().0 = mode;
    }

    /// Start the next sample period
    fn advance(&self) {
        self.state.lock().1 += 1;
    }
}

fn memory(metric: &str) -> String {
    format!("puppetserver:name=puppetlabs.localhost.memory.{}", metric)
}

fn jruby(metric: &str) -> String {
    format!("puppetserver:name=puppetlabs.localhost.jruby.{}", metric)
}

impl Fetch for SimulatedServer {
    fn fetch(&self, query: &MetricQuery) -> Result<Value> {
        let (mode, sample) = *self.state.lock();
        match mode {
            Mode::Unreachable => return Err(MetricsError::fetch("connection refused")),
            Mode::Broken => return Err(MetricsError::render("unexpected")),
            Mode::Healthy => {}
        }

        let value = match (query.kind.as_deref(), query.name.as_deref()) {
            (Some("OperatingSystem"), _) => json!({
                "AvailableProcessors": 4,
                "SystemLoadAverage": 1.25,
                "TotalPhysicalMemorySize": 16.0 * GIB,
                "ProcessCpuTime": sample * 6_000_000_000,
            }),
            (Some("Threading"), _) => json!({
                "ThreadCount": 50 + sample,
                "DaemonThreadCount": 30,
                "PeakThreadCount": 120,
            }),
            (_, Some(name)) if name.contains("memory") => json!({
                memory("heap.max"): {"Value": 2.0 * GIB},
                memory("heap.used"): {"Value": 1.5 * GIB},
            }),
            (_, Some(name)) if name.contains("jruby") => json!({
                jruby("num-jrubies"): {"Value": 4},
                jruby("num-free-jrubies"): {"Value": 1},
                jruby("free-jrubies-histo"): {"Mean": 2.5},
                jruby("borrow-timer"): {"MeanRate": 12.5, "OneMinuteRate": 20.0, "Mean": 350.0},
                jruby("queue-limit-hit-meter"): {"MeanRate": 0.0, "OneMinuteRate": 0.0},
                jruby("wait-timer"): {"Mean": 15.0},
            }),
            _ => return Err(MetricsError::fetch(format!("no such metric: {}", query.path()))),
        };

        Ok(json!({
            "status": 200,
            "timestamp": 1_700_000_000 + sample * 3,
            "value": value,
        }))
    }
}

fn screen_row(terminal: &Terminal<TestBackend>, row: u16) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer[(x, row)].symbol())
        .collect()
}

fn started_app(server: &Arc<SimulatedServer>) -> DashboardApp {
    let mut app = DashboardApp::new("compiler01.lan", server.clone()).unwrap();
    app.setup().unwrap();
    app
}

#[test]
fn test_snapshot_after_two_samples() {
    let server = SimulatedServer::new();
    let mut metrics = MetricSet::new(server.clone());

    let baseline = metrics.establish().unwrap();
    assert_eq!(baseline.processors, 4.0);
    assert_eq!(baseline.heap_max, 2.0 * GIB);
    assert_eq!(baseline.num_rubies, 4.0);

    // No previous sample yet, so no CPU rate
    assert_eq!(metrics.snapshot().cpu_time_rate, 0.0);

    server.advance();
    assert!(metrics.refresh_all().is_empty());

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.cpu_time_rate, 2.0);
    assert_eq!(snapshot.thread_count, 51.0);
    assert_eq!(snapshot.used_rubies, 3.0);
    assert_eq!(snapshot.mean_used_rubies, 1.5);
    assert_eq!(snapshot.request_rate_1min, 20.0);
    assert_eq!(snapshot.heap_used, 1.5 * GIB);
}

#[test]
fn test_failed_refresh_keeps_previous_values() {
    let server = SimulatedServer::new();
    let mut app = started_app(&server);

    server.advance();
    app.tick(chrono::Local::now()).unwrap();
    let before = app.metrics().snapshot();

    server.set_mode(Mode::Unreachable);
    app.tick(chrono::Local::now()).unwrap();

    assert_eq!(app.metrics().snapshot(), before);

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal
        .draw(|frame| frame.render_widget(app.dashboard(), frame.area()))
        .unwrap();
    let status = screen_row(&terminal, 23);
    assert!(status.starts_with("operating system: "), "status was {:?}", status);
    assert!(status.contains("connection refused"));
    assert!(status.ends_with("q: quit"));

    // Recovery clears the status line
    server.set_mode(Mode::Healthy);
    server.advance();
    app.tick(chrono::Local::now()).unwrap();
    terminal
        .draw(|frame| frame.render_widget(app.dashboard(), frame.area()))
        .unwrap();
    assert_eq!(screen_row(&terminal, 23).trim_start(), "q: quit");
}

#[test]
fn test_other_errors_end_the_dashboard() {
    let server = SimulatedServer::new();
    let mut app = started_app(&server);

    server.set_mode(Mode::Broken);
    let err = app.tick(chrono::Local::now()).unwrap_err();
    assert!(!err.is_fetch());
}

#[test]
fn test_unreachable_server_fails_setup() {
    let server = SimulatedServer::new();
    server.set_mode(Mode::Unreachable);

    let mut app = DashboardApp::new("compiler01.lan", server).unwrap();
    let err = app.setup().unwrap_err();
    assert!(matches!(err, MetricsError::Config(_)));
    assert!(err.to_string().contains("operating system"));
}

#[test]
fn test_rendered_screen() {
    let server = SimulatedServer::new();
    let mut app = started_app(&server);
    server.advance();
    app.tick(chrono::Local::now()).unwrap();

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal
        .draw(|frame| frame.render_widget(app.dashboard(), frame.area()))
        .unwrap();

    let header = screen_row(&terminal, 0);
    assert!(header.starts_with("Node: compiler01.lan"));
    assert!(header.contains("Puppetserver Metrics"));

    assert!(screen_row(&terminal, 4).contains("Current:   51"));
    assert!(screen_row(&terminal, 4).contains("Load:  1.25"));
    assert!(screen_row(&terminal, 6).contains("Mem:    16G"));

    assert!(screen_row(&terminal, 5).starts_with("JVM"));
    assert!(screen_row(&terminal, 3).contains("CPU Time (2.00)"));
    assert!(screen_row(&terminal, 7).contains("Heap (1.50G)"));

    let jruby = app.dashboard().jruby_in_use();
    assert_eq!(jruby.limit(Half::Upper), Some(4.0));
    assert_eq!(jruby.limit(Half::Lower), Some(4.0));
}

#[test]
fn test_small_terminal_is_clipped() {
    let server = SimulatedServer::new();
    let app = started_app(&server);

    let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
    terminal
        .draw(|frame| frame.render_widget(app.dashboard(), frame.area()))
        .unwrap();

    assert!(screen_row(&terminal, 0).starts_with("Node: compiler01.lan"));
}
