//! Terminal dashboard for Puppetserver metrics.
//!
//! Draws auto-scaling bar gauges on a fixed character grid using ratatui.

mod app;
pub mod dashboard;
mod event_handler;
pub mod gauge;
pub mod scale;
mod terminal;

pub use app::{run_dashboard, DashboardApp, DashboardOptions};
pub use dashboard::Dashboard;
pub use event_handler::{spawn_key_watcher, DashboardEvent};
pub use gauge::{fill_cells, GaugeWidget, Half, GAUGE_HEIGHT, GAUGE_WIDTH, TRACK_WIDTH};
pub use scale::{limit_and_label, scale_unit, AxisLimit, LABEL_WIDTH};
pub use terminal::{install_panic_hook, restore_terminal, TerminalSession};
