use std::io;
use thiserror::Error;

/// Error type for the metrics dashboard
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("TUI error: {0}")]
    Tui(String),
}

/// Result type alias for the metrics dashboard
pub type Result<T> = std::result::Result<T, MetricsError>;

impl MetricsError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        MetricsError::Config(msg.into())
    }

    /// Create a fetch error
    pub fn fetch<S: Into<String>>(msg: S) -> Self {
        MetricsError::Fetch(msg.into())
    }

    pub fn render<S: Into<String>>(msg: S) -> Self {
        MetricsError::Render(msg.into())
    }

    pub fn tui<S: Into<String>>(msg: S) -> Self {
        MetricsError::Tui(msg.into())
    }

    /// Failures of a single refresh that the dashboard survives by keeping
    /// the previous values on screen.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            MetricsError::Fetch(_) | MetricsError::Http(_) | MetricsError::Json(_)
        )
    }
}
