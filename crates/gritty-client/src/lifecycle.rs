//! Connection lifecycle: handshake sequencing and disconnect notification.
//!
//! Owns the session state and the grace-delayed post-connect path. Every
//! disconnect is treated as transient — reconnection itself belongs to the
//! transport — and the only failure ever surfaced to the user is the
//! in-surface notice.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use gritty_core::{ClientEvent, GrittyError, GrittyResult};

use crate::indicator::HealthIndicator;
use crate::surface::DisplaySurface;

/// Text written into the surface when the connection drops.
pub const DISCONNECT_NOTICE: &str = "terminal disconnected...";

/// Session connection state, owned exclusively by the lifecycle manager.
/// All other components observe it through events, never by polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Sequences the connect-time handshake and the disconnect notice.
pub struct LifecycleManager {
    /// Environment mapping carried unmodified in every handshake.
    env: HashMap<String, String>,
    grace_delay: Duration,
    state: SessionState,
    /// Pending activation deadlines, one per observed connect. Deliberately
    /// not cancelled on disconnect: a disconnect inside the grace window
    /// produces a brief indicator flicker once the transport reconnects,
    /// which matches the contract this client implements.
    pending: VecDeque<Instant>,
}

impl LifecycleManager {
    pub fn new(env: HashMap<String, String>, grace_delay: Duration) -> Self {
        Self {
            env,
            grace_delay,
            state: SessionState::Connecting,
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Earliest pending grace deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.front().copied()
    }

    /// The transport (re)connected: schedule the delayed handshake. The
    /// grace window keeps the indicator dark while the server-side auth
    /// check resolves, so rapid reconnect storms do not flash it.
    pub fn on_connect(&mut self) {
        self.state = SessionState::Connected;
        self.pending.push_back(Instant::now() + self.grace_delay);
        debug!(delay = ?self.grace_delay, "handshake scheduled");
    }

    /// The earliest grace deadline elapsed: activate the indicator, then
    /// send the `terminal` handshake followed immediately by an explicit
    /// `resize`. Both carry the surface's geometry read now — never a
    /// cached value — and both go out on every connect because the server
    /// consumes `terminal` as the session-initiation signal independent of
    /// geometry updates.
    pub async fn on_grace_elapsed(
        &mut self,
        surface: &mut dyn DisplaySurface,
        indicator: &mut HealthIndicator,
        outgoing: &mpsc::Sender<ClientEvent>,
    ) -> GrittyResult<()> {
        self.pending.pop_front();
        indicator.activate(surface)?;

        let geometry = surface.geometry();
        outgoing
            .send(ClientEvent::Terminal {
                env: self.env.clone(),
                geometry,
            })
            .await
            .map_err(|_| GrittyError::Transport("transport task gone".into()))?;
        outgoing
            .send(ClientEvent::Resize(geometry))
            .await
            .map_err(|_| GrittyError::Transport("transport task gone".into()))?;

        debug!(cols = geometry.cols, rows = geometry.rows, "session handshake sent");
        Ok(())
    }

    /// The transport dropped: write the notice and darken the indicator,
    /// with no delay. Reconnection is the transport's job.
    pub fn on_disconnect(
        &mut self,
        surface: &mut dyn DisplaySurface,
        indicator: &mut HealthIndicator,
    ) -> GrittyResult<()> {
        self.state = SessionState::Disconnected;
        surface.writeln(DISCONNECT_NOTICE)?;
        indicator.deactivate(surface)
    }
}
