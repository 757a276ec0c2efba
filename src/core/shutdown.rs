//! Cooperative cancellation.
//!
//! Termination signals and the quit keys all funnel into one [`StopSignal`].
//! The run loop sleeps on it, so a stop request cuts the current wait short
//! instead of letting it run to the next tick.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::error::{MetricsError, Result};

/// Process-wide stop flag that can be waited on with a timeout.
///
/// Setting it is idempotent: only the first `trigger` changes state,
/// later calls are no-ops.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Returns `true` only for the call that set the flag.
    pub fn trigger(&self) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock();
        if *stopped {
            return false;
        }
        *stopped = true;
        cvar.notify_all();
        true
    }

    pub fn is_set(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Block until the timeout elapses or a stop is requested, whichever
    /// comes first. Returns `true` if the flag is set.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock();
        if !*stopped && !timeout.is_zero() {
            cvar.wait_while_for(&mut stopped, |stopped| !*stopped, timeout);
        }
        *stopped
    }
}

/// Route SIGHUP, SIGINT and SIGTERM into `stop`.
///
/// The handler runs on the `ctrlc` helper thread and only sets the flag; it
/// never touches the screen. Only one bridge can exist per process.
pub fn install_signal_bridge(stop: &StopSignal) -> Result<()> {
    let stop = stop.clone();
    ctrlc::set_handler(move || {
        stop.trigger();
    })
    .map_err(|e| MetricsError::config(format!("Failed to install signal handler: {}", e)))
}
