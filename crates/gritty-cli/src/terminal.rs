//! Local-terminal display surface.
//!
//! Drives the host terminal as the bridge's rendering surface: raw mode via
//! an RAII guard, output straight to stdout, cursor blink through crossterm
//! commands, and a blocking reader thread translating crossterm events into
//! surface input and viewport notifications.

use std::io::Write;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use tokio::sync::mpsc;
use tracing::warn;

use gritty_client::{DisplaySurface, SurfaceEvent};
use gritty_core::{Geometry, GrittyResult};

/// RAII guard that restores the terminal to its original mode on drop.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Enter raw terminal mode.
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw terminal mode")?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Best-effort restore — if this fails, the user's terminal may be
        // in a bad state, but there's nothing we can do about it in a Drop impl.
        let _ = terminal::disable_raw_mode();
    }
}

/// Current terminal size, falling back to 80x24 when it cannot be read
/// (pipes, some CI environments).
pub fn current_geometry() -> Geometry {
    let (cols, rows) = terminal::size().unwrap_or((80, 24));
    Geometry::new(cols, rows)
}

/// The host terminal as a display surface.
///
/// The host emulator owns scrollback, tab stops, and theming, so the
/// surface construction options do not apply here; `fit()` re-reads the
/// terminal size and reports a changed grid through the event channel.
pub struct CrosstermSurface {
    stdout: std::io::Stdout,
    geometry: Geometry,
    events: mpsc::UnboundedSender<SurfaceEvent>,
}

impl CrosstermSurface {
    pub fn new(events: mpsc::UnboundedSender<SurfaceEvent>) -> Self {
        Self {
            stdout: std::io::stdout(),
            geometry: current_geometry(),
            events,
        }
    }
}

impl DisplaySurface for CrosstermSurface {
    fn write(&mut self, data: &str) -> GrittyResult<()> {
        self.stdout.write_all(data.as_bytes())?;
        self.stdout.flush()?;
        Ok(())
    }

    fn fit(&mut self) -> GrittyResult<()> {
        let geometry = current_geometry();
        if geometry != self.geometry {
            self.geometry = geometry;
            let _ = self.events.send(SurfaceEvent::GeometryChanged(geometry));
        }
        Ok(())
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn set_cursor_blink(&mut self, enabled: bool) -> GrittyResult<()> {
        if enabled {
            execute!(self.stdout, cursor::EnableBlinking)?;
        } else {
            execute!(self.stdout, cursor::DisableBlinking)?;
        }
        Ok(())
    }
}

/// Spawn a blocking thread that reads crossterm events and feeds the
/// bridge: key input becomes `SurfaceEvent::Input`, terminal resizes become
/// viewport notifications, and Ctrl+] requests a detach.
pub fn spawn_event_reader(
    input_tx: mpsc::UnboundedSender<SurfaceEvent>,
    viewport_tx: mpsc::UnboundedSender<()>,
    quit_tx: mpsc::Sender<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key_event)) => {
                    // Ctrl+] detaches (like ssh ~.).
                    if key_event.modifiers.contains(KeyModifiers::CONTROL)
                        && key_event.code == KeyCode::Char(']')
                    {
                        let _ = quit_tx.blocking_send(());
                        break;
                    }

                    if let Some(bytes) = key_event_to_bytes(&key_event) {
                        let payload = String::from_utf8_lossy(&bytes).into_owned();
                        if input_tx.send(SurfaceEvent::Input(payload)).is_err() {
                            break;
                        }
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if viewport_tx.send(()).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("crossterm event error: {e}");
                    break;
                }
            }
        }
    })
}

/// Convert a crossterm key event to the raw bytes a remote PTY expects.
fn key_event_to_bytes(event: &crossterm::event::KeyEvent) -> Option<Vec<u8>> {
    match event.code {
        KeyCode::Char(c) => {
            if event.modifiers.contains(KeyModifiers::CONTROL) {
                // Ctrl+A = 0x01, Ctrl+B = 0x02, etc.
                let byte = (c as u8).wrapping_sub(b'a').wrapping_add(1);
                if byte <= 26 {
                    return Some(vec![byte]);
                }
            }
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            Some(s.as_bytes().to_vec())
        }
        KeyCode::Enter => Some(vec![b'\r']),
        KeyCode::Backspace => Some(vec![0x7f]),
        KeyCode::Tab => Some(vec![b'\t']),
        KeyCode::Esc => Some(vec![0x1b]),
        KeyCode::Up => Some(b"\x1b[A".to_vec()),
        KeyCode::Down => Some(b"\x1b[B".to_vec()),
        KeyCode::Right => Some(b"\x1b[C".to_vec()),
        KeyCode::Left => Some(b"\x1b[D".to_vec()),
        KeyCode::Home => Some(b"\x1b[H".to_vec()),
        KeyCode::End => Some(b"\x1b[F".to_vec()),
        KeyCode::PageUp => Some(b"\x1b[5~".to_vec()),
        KeyCode::PageDown => Some(b"\x1b[6~".to_vec()),
        KeyCode::Insert => Some(b"\x1b[2~".to_vec()),
        KeyCode::Delete => Some(b"\x1b[3~".to_vec()),
        KeyCode::F(n) => {
            let seq = match n {
                1 => "\x1bOP",
                2 => "\x1bOQ",
                3 => "\x1bOR",
                4 => "\x1bOS",
                5 => "\x1b[15~",
                6 => "\x1b[17~",
                7 => "\x1b[18~",
                8 => "\x1b[19~",
                9 => "\x1b[20~",
                10 => "\x1b[21~",
                11 => "\x1b[23~",
                12 => "\x1b[24~",
                _ => return None,
            };
            Some(seq.as_bytes().to_vec())
        }
        _ => None,
    }
}
