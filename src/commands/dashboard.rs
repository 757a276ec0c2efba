//! Dashboard command handler.
//!
//! Resolves the server configuration and runs the metrics TUI.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::{ConfigOverrides, PuppetPaths, DEFAULT_INTERVAL_SECS};
use crate::ui::metrics_tui::{run_dashboard, DashboardOptions};

/// Collect the command line overrides for the server configuration
pub fn overrides_from(matches: &ArgMatches) -> ConfigOverrides {
    ConfigOverrides {
        server: matches.get_one::<String>("server").cloned(),
        port: matches.get_one::<u16>("port").copied(),
        cacert: matches.get_one::<PathBuf>("cacert").cloned(),
        cert: matches.get_one::<PathBuf>("cert").cloned(),
        key: matches.get_one::<PathBuf>("key").cloned(),
        no_proxy: matches.get_flag("no-proxy"),
    }
}

/// Execute the dashboard command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let interval = matches
        .get_one::<u64>("interval")
        .copied()
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    let paths = PuppetPaths::detect()?;
    let config = paths.resolve(&overrides_from(matches))?;

    let options = DashboardOptions {
        interval: Duration::from_secs(interval),
        // Log lines on stderr would land on top of the dashboard
        mute_logs: matches.get_one::<PathBuf>("log-file").is_none(),
    };

    run_dashboard(&config, &options)
        .with_context(|| format!("Dashboard for {} failed", config.server))
}
