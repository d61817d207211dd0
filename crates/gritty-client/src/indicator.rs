//! Connection health indicator.
//!
//! Liveness is signalled through the surface's cursor blink mode. The two
//! paths are asymmetric: activation happens only behind the lifecycle
//! manager's grace window, deactivation is immediate on disconnect.

use gritty_core::GrittyResult;

use crate::surface::DisplaySurface;

/// Tracks whether the blinking-cursor liveness cue is on.
#[derive(Debug, Default)]
pub struct HealthIndicator {
    active: bool,
}

impl HealthIndicator {
    pub fn new() -> Self {
        Self { active: false }
    }

    /// Whether the liveness cue is currently on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Turn the blinking cursor on.
    pub fn activate(&mut self, surface: &mut dyn DisplaySurface) -> GrittyResult<()> {
        self.active = true;
        surface.set_cursor_blink(true)
    }

    /// Turn the blinking cursor off.
    pub fn deactivate(&mut self, surface: &mut dyn DisplaySurface) -> GrittyResult<()> {
        self.active = false;
        surface.set_cursor_blink(false)
    }
}
