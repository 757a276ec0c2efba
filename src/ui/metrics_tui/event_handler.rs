use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::shutdown::StopSignal;
use crate::error::{MetricsError, Result};

const KEY_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Events that can occur in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Quit the application
    Quit,
    /// No action
    None,
}

impl From<KeyEvent> for DashboardEvent {
    fn from(key: KeyEvent) -> Self {
        if key.kind != KeyEventKind::Press {
            return DashboardEvent::None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => DashboardEvent::Quit,
            // Raw mode swallows the terminal's own Ctrl+C handling
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                DashboardEvent::Quit
            }
            _ => DashboardEvent::None,
        }
    }
}

/// Watch the keyboard on a background thread and set `stop` when a quit
/// key is pressed. The thread ends once `stop` is set by anyone.
pub fn spawn_key_watcher(stop: StopSignal) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("key-watcher".to_string())
        .spawn(move || {
            while !stop.is_set() {
                match event::poll(KEY_POLL_INTERVAL) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) => {
                            if DashboardEvent::from(key) == DashboardEvent::Quit {
                                stop.trigger();
                            }
                        }
                        Ok(_) => {}
                        Err(e) => {
                            log::error!("Reading terminal input failed: {}", e);
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(e) => {
                        log::error!("Polling terminal input failed: {}", e);
                        break;
                    }
                }
            }
        })
        .map_err(|e| MetricsError::tui(format!("Failed to start key watcher: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, kind)
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let event = key(code, KeyModifiers::NONE, KeyEventKind::Press);
            assert_eq!(DashboardEvent::from(event), DashboardEvent::Quit);
        }

        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(DashboardEvent::from(ctrl_c), DashboardEvent::Quit);
    }

    #[test]
    fn test_other_keys_ignored() {
        let plain_c = key(KeyCode::Char('c'), KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(DashboardEvent::from(plain_c), DashboardEvent::None);

        let release = key(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(DashboardEvent::from(release), DashboardEvent::None);

        let tab = key(KeyCode::Tab, KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(DashboardEvent::from(tab), DashboardEvent::None);
    }
}
