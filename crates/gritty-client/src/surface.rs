//! Display surface seam.
//!
//! The rendering widget is an external collaborator: it paints bytes, owns
//! the authoritative geometry, and emits input and geometry-changed events.
//! The bridge only ever talks to it through this trait plus an event
//! channel handed over at construction time.

use gritty_core::{Geometry, GrittyResult};

/// Events emitted by a display surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The user produced input (keystrokes, paste).
    Input(String),
    /// The surface recomputed its cell grid.
    GeometryChanged(Geometry),
}

/// A terminal rendering surface.
///
/// The authoritative copy of the geometry lives with the surface;
/// `geometry()` must always return the last computed value.
pub trait DisplaySurface: Send {
    /// Write raw output verbatim.
    fn write(&mut self, data: &str) -> GrittyResult<()>;

    /// Write a line followed by CRLF.
    fn writeln(&mut self, line: &str) -> GrittyResult<()> {
        self.write(line)?;
        self.write("\r\n")
    }

    /// Refit the cell grid to the containing viewport. A changed grid is
    /// reported through `SurfaceEvent::GeometryChanged`, never returned.
    fn fit(&mut self) -> GrittyResult<()>;

    /// Last computed geometry.
    fn geometry(&self) -> Geometry;

    /// Switch the cursor rendering mode between blinking and steady.
    fn set_cursor_blink(&mut self, enabled: bool) -> GrittyResult<()>;
}

/// Construction options consumed verbatim by surface implementations.
///
/// Surfaces backed by a host terminal emulator ignore the knobs the
/// emulator owns (scrollback, tab stops); widget-style surfaces consume all
/// of them.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    /// Scrollback length in lines.
    pub scrollback: u32,
    /// Tab stop width in cells.
    pub tab_stop_width: u8,
    /// Named color theme.
    pub theme: String,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            scrollback: 1000,
            tab_stop_width: 4,
            theme: "gritty".to_string(),
        }
    }
}
