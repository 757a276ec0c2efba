//! The fixed 80 × 24 screen: header, text panels and the five gauges.

use chrono::{DateTime, Local};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use super::gauge::{GaugeWidget, Half};
use super::scale::scale_unit;
use crate::core::puppet_metrics::{Baseline, Snapshot};
use crate::error::{MetricsError, Result};

pub const SCREEN_WIDTH: u16 = 80;
pub const SCREEN_HEIGHT: u16 = 24;

const TITLE: &str = "Puppetserver Metrics";
const TITLE_COLUMN_START: u16 = 30;
const CLOCK_COLUMN: u16 = 50;
const CLOCK_WIDTH: usize = 30;
const STATUS_ROW: u16 = 23;
const QUIT_HINT: &str = "q: quit";

const THREADS_COLUMN: u16 = 48;
const THREADS_VALUE_COLUMN: u16 = 56;
const SYSTEM_COLUMN: u16 = 63;
const SYSTEM_VALUE_COLUMN: u16 = 69;

/// `asctime` style, e.g. `Sun Oct 18 14:03:27 2026`
pub fn format_clock(time: &DateTime<Local>) -> String {
    time.format("%a %b %e %H:%M:%S %Y").to_string()
}

fn format_count(value: f64) -> String {
    format!("{:5}", value.round() as u64)
}

pub struct Dashboard {
    server: String,
    cells: Buffer,
    jvm: GaugeWidget,
    requests: GaugeWidget,
    queue_limit: GaugeWidget,
    jruby_in_use: GaugeWidget,
    jruby_times: GaugeWidget,
}

impl Dashboard {
    /// Lay out the static parts of the screen
    pub fn new(server: &str) -> Result<Self> {
        let area = Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);
        let mut dashboard = Self {
            server: server.to_string(),
            cells: Buffer::empty(area),
            jvm: place_gauge(area, 8, 3)?,
            requests: place_gauge(area, 8, 10)?,
            queue_limit: place_gauge(area, 45, 10)?,
            jruby_in_use: place_gauge(area, 8, 17)?,
            jruby_times: place_gauge(area, 45, 17)?,
        };

        let node: String = format!("Node: {}", server)
            .chars()
            .take(TITLE_COLUMN_START as usize - 1)
            .collect();
        dashboard.put_str(0, 0, &node);
        dashboard.put_str(0, TITLE_COLUMN_START, TITLE);

        dashboard.put_str(3, THREADS_COLUMN, &format!("{:^13}", "JVM Threads"));
        dashboard.put_str(4, THREADS_COLUMN, &format!("{:<8}", "Current:"));
        dashboard.put_str(5, THREADS_COLUMN, &format!("{:<8}", "Daemon:"));
        dashboard.put_str(6, THREADS_COLUMN, &format!("{:<8}", "Peak:"));

        dashboard.put_str(3, SYSTEM_COLUMN, &format!("{:^10}", "System"));
        dashboard.put_str(4, SYSTEM_COLUMN, &format!("{:<7}", "Load:"));
        dashboard.put_str(5, SYSTEM_COLUMN, &format!("{:<7}", "CPUs:"));
        dashboard.put_str(6, SYSTEM_COLUMN, &format!("{:<7}", "Mem:"));

        dashboard.put_str(5, 0, "JVM");
        dashboard.jvm.set_title(Half::Upper, "CPU Time");
        dashboard.jvm.set_title(Half::Lower, "Heap");

        dashboard.put_str(12, 0, "REQ");
        dashboard.requests.set_title(Half::Upper, "Mean Rate");
        dashboard.requests.set_title(Half::Lower, "1min Rate");

        dashboard.queue_limit.set_title(Half::Upper, "Mean Q-Lim Rate");
        dashboard.queue_limit.set_title(Half::Lower, "1min Q-Lim Rate");

        dashboard.put_str(19, 0, "JRUBY");
        dashboard.jruby_in_use.set_title(Half::Upper, "Mean In-Use");
        dashboard.jruby_in_use.set_title(Half::Lower, "Current In-Use");

        dashboard.jruby_times.set_title(Half::Upper, "Service Time");
        dashboard.jruby_times.set_title(Half::Lower, "Wait Time");

        dashboard.set_status(None);

        Ok(dashboard)
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Size the gauges whose scale is known up front
    pub fn seed_limits(&mut self, baseline: &Baseline) {
        self.jvm.set_limit(Half::Upper, baseline.processors);
        self.jvm.set_limit(Half::Lower, baseline.heap_max);
        self.jruby_in_use.set_limit_both(baseline.num_rubies);
    }

    /// Push the values of one tick onto the screen
    pub fn update(&mut self, snapshot: &Snapshot) {
        self.put_str(4, THREADS_VALUE_COLUMN, &format_count(snapshot.thread_count));
        self.put_str(5, THREADS_VALUE_COLUMN, &format_count(snapshot.daemon_thread_count));
        self.put_str(6, THREADS_VALUE_COLUMN, &format_count(snapshot.peak_thread_count));

        self.put_str(4, SYSTEM_VALUE_COLUMN, &format!("{:5.2}", snapshot.load_average));
        self.put_str(5, SYSTEM_VALUE_COLUMN, &format_count(snapshot.processors));
        self.put_str(
            6,
            SYSTEM_VALUE_COLUMN,
            &format!("{:>5}", scale_unit(snapshot.physical_memory, 0)),
        );

        self.jvm.set_value(Half::Upper, snapshot.cpu_time_rate, 2);
        self.jvm.set_value(Half::Lower, snapshot.heap_used, 2);

        self.requests.set_limit_both(snapshot.request_rate_mean);
        self.requests.set_limit_both(snapshot.request_rate_1min);
        self.requests.set_value(Half::Upper, snapshot.request_rate_mean, 1);
        self.requests.set_value(Half::Lower, snapshot.request_rate_1min, 1);

        self.queue_limit.set_limit_both(snapshot.queue_limit_rate_mean);
        self.queue_limit.set_limit_both(snapshot.queue_limit_rate_1min);
        self.queue_limit.set_value(Half::Upper, snapshot.queue_limit_rate_mean, 2);
        self.queue_limit.set_value(Half::Lower, snapshot.queue_limit_rate_1min, 2);

        self.jruby_in_use.set_value(Half::Upper, snapshot.mean_used_rubies, 2);
        self.jruby_in_use.set_value(Half::Lower, snapshot.used_rubies, 0);

        self.jruby_times.set_limit_both(snapshot.borrow_time_mean);
        self.jruby_times.set_limit_both(snapshot.wait_time_mean);
        self.jruby_times.set_value(Half::Upper, snapshot.borrow_time_mean, 1);
        self.jruby_times.set_value(Half::Lower, snapshot.wait_time_mean, 1);
    }

    pub fn set_clock(&mut self, time: &DateTime<Local>) {
        let clock = format!("{:>width$}", format_clock(time), width = CLOCK_WIDTH);
        self.put_str(0, CLOCK_COLUMN, &clock);
    }

    /// Show a message on the bottom row, or clear it
    pub fn set_status(&mut self, message: Option<&str>) {
        let width = SCREEN_WIDTH as usize - QUIT_HINT.len() - 1;
        let text: String = message.unwrap_or("").chars().take(width).collect();
        self.put_str(
            STATUS_ROW,
            0,
            &format!("{:<width$} {}", text, QUIT_HINT, width = width),
        );
    }

    pub fn gauges(&self) -> [&GaugeWidget; 5] {
        [
            &self.jvm,
            &self.requests,
            &self.queue_limit,
            &self.jruby_in_use,
            &self.jruby_times,
        ]
    }

    pub fn jvm(&self) -> &GaugeWidget {
        &self.jvm
    }

    pub fn requests(&self) -> &GaugeWidget {
        &self.requests
    }

    pub fn jruby_in_use(&self) -> &GaugeWidget {
        &self.jruby_in_use
    }

    fn put_str(&mut self, row: u16, col: u16, text: &str) {
        self.cells.set_string(col, row, text, Style::default());
    }
}

fn place_gauge(screen: Rect, x: u16, y: u16) -> Result<GaugeWidget> {
    let gauge = GaugeWidget::new(x, y);
    if screen.union(gauge.area()) != screen {
        return Err(MetricsError::render(format!(
            "gauge at ({}, {}) does not fit on a {}x{} screen",
            x, y, screen.width, screen.height
        )));
    }
    Ok(gauge)
}

impl Widget for &Dashboard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = self.cells.area.intersection(area).intersection(buf.area);
        for y in visible.top()..visible.bottom() {
            for x in visible.left()..visible.right() {
                buf[(x, y)] = self.cells[(x, y)].clone();
            }
        }

        for gauge in self.gauges() {
            gauge.render(area, buf);
        }
    }
}
