// UI module

pub mod metrics_tui;

// Re-export commonly used items for cleaner imports
pub use metrics_tui::{limit_and_label, run_dashboard, scale_unit, DashboardOptions};
