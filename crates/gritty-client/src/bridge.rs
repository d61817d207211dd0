//! Session bridge: pure composition of the transport, the display surface,
//! the data relay, the resize synchronizer, the lifecycle manager, and the
//! health indicator.
//!
//! All behavior is reaction to events dispatched on one logical queue: the
//! bridge task `select!`s over surface events, transport events, viewport
//! notifications, the earliest pending grace deadline, and the teardown
//! signal; every handler runs to completion before the next event is
//! processed. No retry or validation logic lives here.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use gritty_core::ClientEvent;

use crate::config::{ws_origin, BridgeConfig};
use crate::indicator::HealthIndicator;
use crate::lifecycle::{LifecycleManager, SessionState};
use crate::surface::{DisplaySurface, SurfaceEvent};
use crate::transport::{websocket, TransportEvent, TransportHandle};
use crate::{relay, resize};

/// Handle to a running session bridge.
///
/// Exposes the raw transport queue for caller-level extension, the session
/// state for observation, and an explicit teardown that deterministically
/// drops every subscription (surface, transport, viewport).
pub struct BridgeHandle {
    outgoing: mpsc::Sender<ClientEvent>,
    state: watch::Receiver<SessionState>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    supervisor: Option<JoinHandle<()>>,
}

impl BridgeHandle {
    /// Raw access to the outgoing transport queue.
    pub fn sender(&self) -> mpsc::Sender<ClientEvent> {
        self.outgoing.clone()
    }

    /// Observe the session state.
    pub fn state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Tear the bridge down: stop the event loop, drop every subscription,
    /// and wait for the loop to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        if let Some(supervisor) = self.supervisor.take() {
            supervisor.abort();
        }
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Some(supervisor) = self.supervisor.take() {
            supervisor.abort();
        }
    }
}

/// Connect a WebSocket transport per `config` and bridge it to `surface`.
///
/// `surface_rx` carries the surface's input and geometry-changed events;
/// `viewport_rx` carries platform viewport-resize notifications.
pub fn open(
    config: BridgeConfig,
    origin: &str,
    surface: Box<dyn DisplaySurface>,
    surface_rx: mpsc::UnboundedReceiver<SurfaceEvent>,
    viewport_rx: mpsc::UnboundedReceiver<()>,
) -> BridgeHandle {
    let url = config.endpoint(&ws_origin(origin));
    let transport = websocket::connect(&url, config.policy.clone());
    open_with_transport(config, surface, surface_rx, viewport_rx, transport)
}

/// Compose a bridge over a prebuilt transport (tests, custom transports).
pub fn open_with_transport(
    config: BridgeConfig,
    mut surface: Box<dyn DisplaySurface>,
    mut surface_rx: mpsc::UnboundedReceiver<SurfaceEvent>,
    mut viewport_rx: mpsc::UnboundedReceiver<()>,
    transport: TransportHandle,
) -> BridgeHandle {
    let (outgoing, mut transport_rx, supervisor) = transport.into_parts();

    let mut lifecycle = LifecycleManager::new(config.env.clone(), config.grace_delay);
    let mut indicator = HealthIndicator::new();
    let (state_tx, state_rx) = watch::channel(lifecycle.state());
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let loop_outgoing = outgoing.clone();
    let task = tokio::spawn(async move {
        loop {
            let deadline = lifecycle.next_deadline();

            tokio::select! {
                _ = &mut shutdown_rx => {
                    debug!("bridge torn down");
                    break;
                }

                maybe = surface_rx.recv() => {
                    let Some(event) = maybe else { break };
                    let result = match event {
                        SurfaceEvent::Input(payload) => {
                            relay::forward_input(&loop_outgoing, payload).await
                        }
                        SurfaceEvent::GeometryChanged(geometry) => {
                            resize::on_geometry_changed(&loop_outgoing, geometry).await
                        }
                    };
                    if let Err(e) = result {
                        warn!("surface event dropped: {e}");
                    }
                }

                maybe = transport_rx.recv() => {
                    let Some(event) = maybe else { break };
                    let result = match event {
                        TransportEvent::Connected => {
                            lifecycle.on_connect();
                            let _ = state_tx.send(lifecycle.state());
                            Ok(())
                        }
                        TransportEvent::Disconnected => {
                            let r = lifecycle.on_disconnect(surface.as_mut(), &mut indicator);
                            let _ = state_tx.send(lifecycle.state());
                            r
                        }
                        TransportEvent::Data(payload) => {
                            relay::forward_output(surface.as_mut(), &payload)
                        }
                    };
                    if let Err(e) = result {
                        warn!("transport event dropped: {e}");
                    }
                }

                Some(()) = viewport_rx.recv() => {
                    if let Err(e) = resize::on_viewport_resize(surface.as_mut()) {
                        warn!("refit failed: {e}");
                    }
                }

                _ = tokio::time::sleep_until(deadline.unwrap_or_else(tokio::time::Instant::now)),
                    if deadline.is_some() =>
                {
                    if let Err(e) = lifecycle
                        .on_grace_elapsed(surface.as_mut(), &mut indicator, &loop_outgoing)
                        .await
                    {
                        warn!("handshake failed: {e}");
                    }
                }
            }
        }
    });

    BridgeHandle {
        outgoing,
        state: state_rx,
        shutdown: Some(shutdown_tx),
        task: Some(task),
        supervisor,
    }
}
