//! Fixed-cadence refresh loop.

use std::time::{Duration, Instant};

use super::schedule::TickSchedule;
use super::shutdown::StopSignal;
use crate::error::Result;

/// Lifecycle of a [`RunLoop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopping,
    Terminated,
}

/// Calls a tick function once per interval until the stop signal is set.
///
/// The wait after each tick is shortened by the time the tick took, and
/// it ends early as soon as a stop is requested.
pub struct RunLoop {
    schedule: TickSchedule,
    stop: StopSignal,
    state: LoopState,
    ticks: u64,
}

impl RunLoop {
    pub fn new(interval: Duration, stop: StopSignal) -> Self {
        Self {
            schedule: TickSchedule::new(interval),
            stop,
            state: LoopState::Idle,
            ticks: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run until stopped. An error returned by `tick` ends the loop and is
    /// passed on; the loop is `Terminated` either way.
    pub fn run<F>(&mut self, mut tick: F) -> Result<()>
    where
        F: FnMut(u64) -> Result<()>,
    {
        self.state = LoopState::Running;
        log::debug!("Run loop started, interval {:?}", self.schedule.interval());

        let result = self.drive(&mut tick);

        self.state = LoopState::Terminated;
        log::debug!("Run loop terminated after {} ticks", self.ticks);
        result
    }

    fn drive<F>(&mut self, tick: &mut F) -> Result<()>
    where
        F: FnMut(u64) -> Result<()>,
    {
        while !self.stop.is_set() {
            let loop_start = Instant::now();
            self.schedule.start_tick(loop_start);

            tick(self.ticks)?;
            self.ticks += 1;

            let sleep_for = self.schedule.remaining(Instant::now());
            if self.stop.wait_timeout(sleep_for) {
                break;
            }
        }

        self.state = LoopState::Stopping;
        Ok(())
    }
}
