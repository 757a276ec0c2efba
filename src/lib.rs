// Puppetserver Metrics Library - Public API

// Re-export error types
pub mod error;
pub use error::{MetricsError, Result};

// Module declarations
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use core::config::ServerConfig;

use std::fs::OpenOptions;
use std::path::Path;

/// Initialize logging.
///
/// Defaults to warnings only, or info with `verbose`; `RUST_LOG` overrides
/// both. With `log_file` set, output is appended to that file.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|e| MetricsError::config(format!("Failed to initialize logging: {}", e)))
}
