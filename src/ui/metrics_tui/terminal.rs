use std::io::{self, Stdout};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{backend::CrosstermBackend, Terminal};

use super::dashboard::Dashboard;
use crate::error::{MetricsError, Result};

/// Raw-mode, alternate-screen terminal owned by the dashboard.
///
/// The terminal is put back the way it was when the session is dropped,
/// so every exit path restores it, errors included.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    saved_log_level: Option<LevelFilter>,
}

impl TerminalSession {
    /// Take over the terminal. With `mute_logs` set, log output is silenced
    /// for the lifetime of the session so stderr lines don't tear the
    /// screen.
    pub fn enter(mute_logs: bool) -> Result<Self> {
        enable_raw_mode().map_err(|e| MetricsError::tui(format!("Failed to enable raw mode: {}", e)))?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = restore_terminal();
            return Err(MetricsError::tui(format!(
                "Failed to enter alternate screen: {}",
                e
            )));
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = restore_terminal();
                return Err(MetricsError::tui(format!("Failed to create terminal: {}", e)));
            }
        };

        let saved_log_level = if mute_logs {
            let level = log::max_level();
            log::set_max_level(LevelFilter::Off);
            Some(level)
        } else {
            None
        };

        Ok(Self {
            terminal,
            saved_log_level,
        })
    }

    pub fn draw(&mut self, dashboard: &Dashboard) -> Result<()> {
        self.terminal
            .draw(|frame| frame.render_widget(dashboard, frame.area()))
            .map_err(|e| MetricsError::tui(format!("Failed to draw: {}", e)))?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Some(level) = self.saved_log_level.take() {
            log::set_max_level(level);
        }
        if let Err(e) = restore_terminal() {
            log::error!("Failed to restore terminal: {}", e);
        }
    }
}

/// Leave raw mode and the alternate screen, show the cursor
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

/// Restore the terminal before the default panic report is printed
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));
}
