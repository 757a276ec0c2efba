// Core logic: configuration, metric sources, cancellation and cadence

pub mod config;
pub mod puppet_metrics;
pub mod run_loop;
pub mod schedule;
pub mod shutdown;

// Re-export commonly used items
pub use config::{ConfigOverrides, PuppetPaths, PuppetSettings, ServerConfig, TlsFiles};
pub use run_loop::{LoopState, RunLoop};
pub use schedule::TickSchedule;
pub use shutdown::{install_signal_bridge, StopSignal};
