//! Bridge behavior over a mock surface and a channel-backed transport.
//!
//! The clock is paused (`start_paused`), so the grace delay elapses only
//! when a test awaits past it; that makes the delayed-activation ordering
//! observable and deterministic.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use gritty_client::{
    open_with_transport, BridgeConfig, BridgeHandle, DisplaySurface, SessionState, SurfaceEvent,
    TransportEvent, TransportHandle, DISCONNECT_NOTICE,
};
use gritty_core::{ClientEvent, Geometry, GrittyResult};

/// Shared view into the mock surface, readable from the test body while the
/// bridge owns the surface itself.
#[derive(Clone)]
struct SurfaceProbe {
    writes: Arc<Mutex<Vec<String>>>,
    blink: Arc<Mutex<Option<bool>>>,
    geometry: Arc<Mutex<Geometry>>,
    next_fit: Arc<Mutex<Option<Geometry>>>,
}

impl SurfaceProbe {
    fn new(geometry: Geometry) -> Self {
        Self {
            writes: Arc::new(Mutex::new(Vec::new())),
            blink: Arc::new(Mutex::new(None)),
            geometry: Arc::new(Mutex::new(geometry)),
            next_fit: Arc::new(Mutex::new(None)),
        }
    }

    fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    fn blink(&self) -> Option<bool> {
        *self.blink.lock().unwrap()
    }

    fn set_geometry(&self, geometry: Geometry) {
        *self.geometry.lock().unwrap() = geometry;
    }

    /// Geometry the next `fit()` call will compute.
    fn set_next_fit(&self, geometry: Geometry) {
        *self.next_fit.lock().unwrap() = Some(geometry);
    }
}

struct MockSurface {
    probe: SurfaceProbe,
    events: mpsc::UnboundedSender<SurfaceEvent>,
}

impl DisplaySurface for MockSurface {
    fn write(&mut self, data: &str) -> GrittyResult<()> {
        self.probe.writes.lock().unwrap().push(data.to_string());
        Ok(())
    }

    fn fit(&mut self) -> GrittyResult<()> {
        if let Some(geometry) = self.probe.next_fit.lock().unwrap().take() {
            *self.probe.geometry.lock().unwrap() = geometry;
            let _ = self.events.send(SurfaceEvent::GeometryChanged(geometry));
        }
        Ok(())
    }

    fn geometry(&self) -> Geometry {
        *self.probe.geometry.lock().unwrap()
    }

    fn set_cursor_blink(&mut self, enabled: bool) -> GrittyResult<()> {
        *self.probe.blink.lock().unwrap() = Some(enabled);
        Ok(())
    }
}

struct Harness {
    probe: SurfaceProbe,
    surface_tx: mpsc::UnboundedSender<SurfaceEvent>,
    viewport_tx: mpsc::UnboundedSender<()>,
    events_tx: mpsc::Sender<TransportEvent>,
    outgoing_rx: mpsc::Receiver<ClientEvent>,
    handle: BridgeHandle,
}

fn start(config: BridgeConfig, geometry: Geometry) -> Harness {
    let (surface_tx, surface_rx) = mpsc::unbounded_channel();
    let (viewport_tx, viewport_rx) = mpsc::unbounded_channel();
    let (outgoing_tx, outgoing_rx) = mpsc::channel(64);
    let (events_tx, events_rx) = mpsc::channel(64);

    let probe = SurfaceProbe::new(geometry);
    let surface = Box::new(MockSurface {
        probe: probe.clone(),
        events: surface_tx.clone(),
    });
    let transport = TransportHandle::from_parts(outgoing_tx, events_rx);
    let handle = open_with_transport(config, surface, surface_rx, viewport_rx, transport);

    Harness {
        probe,
        surface_tx,
        viewport_tx,
        events_tx,
        outgoing_rx,
        handle,
    }
}

/// Let the bridge loop drain everything currently queued. The 1 ms timer is
/// always earlier than the 1 s grace deadline, so this never trips it.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn handshake_carries_env_and_geometry_after_grace() {
    let mut config = BridgeConfig::default();
    config
        .env
        .insert("TERM".to_string(), "xterm-256color".to_string());
    let mut h = start(config.clone(), Geometry::new(80, 24));

    h.events_tx.send(TransportEvent::Connected).await.unwrap();
    settle().await;
    // Inside the grace window the indicator is still dark.
    assert_eq!(h.probe.blink(), None);

    assert_eq!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Terminal {
            env: config.env.clone(),
            geometry: Geometry::new(80, 24),
        }
    );
    assert_eq!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Resize(Geometry::new(80, 24))
    );
    assert_eq!(h.probe.blink(), Some(true));

    // Exactly one terminal and one resize per connect.
    settle().await;
    assert!(h.outgoing_rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn session_state_tracks_transport_events() {
    let h = start(BridgeConfig::default(), Geometry::new(80, 24));
    let state = h.handle.state();
    assert_eq!(*state.borrow(), SessionState::Connecting);

    h.events_tx.send(TransportEvent::Connected).await.unwrap();
    settle().await;
    assert_eq!(*state.borrow(), SessionState::Connected);

    h.events_tx.send(TransportEvent::Disconnected).await.unwrap();
    settle().await;
    assert_eq!(*state.borrow(), SessionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn server_data_written_verbatim_in_order() {
    let h = start(BridgeConfig::default(), Geometry::new(80, 24));

    h.events_tx
        .send(TransportEvent::Data("hello\n".to_string()))
        .await
        .unwrap();
    h.events_tx
        .send(TransportEvent::Data("world".to_string()))
        .await
        .unwrap();
    settle().await;

    assert_eq!(
        h.probe.writes(),
        vec!["hello\n".to_string(), "world".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn surface_input_forwarded_verbatim_in_order() {
    let mut h = start(BridgeConfig::default(), Geometry::new(80, 24));

    // Forwarding is unconditional: nothing has connected yet.
    h.surface_tx
        .send(SurfaceEvent::Input("ls\n".to_string()))
        .unwrap();
    h.surface_tx
        .send(SurfaceEvent::Input("pwd\n".to_string()))
        .unwrap();

    assert_eq!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Data("ls\n".to_string())
    );
    assert_eq!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Data("pwd\n".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn disconnect_writes_notice_and_darkens_indicator_immediately() {
    let mut h = start(BridgeConfig::default(), Geometry::new(80, 24));

    h.events_tx.send(TransportEvent::Connected).await.unwrap();
    let _ = h.outgoing_rx.recv().await; // terminal
    let _ = h.outgoing_rx.recv().await; // resize
    assert_eq!(h.probe.blink(), Some(true));

    h.events_tx.send(TransportEvent::Disconnected).await.unwrap();
    settle().await;

    assert!(h.probe.writes().contains(&DISCONNECT_NOTICE.to_string()));
    assert_eq!(h.probe.blink(), Some(false));
}

#[tokio::test(start_paused = true)]
async fn viewport_resize_refits_and_sends_matching_resize() {
    let mut h = start(BridgeConfig::default(), Geometry::new(80, 24));

    h.probe.set_next_fit(Geometry::new(100, 30));
    h.viewport_tx.send(()).unwrap();

    assert_eq!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Resize(Geometry::new(100, 30))
    );
}

#[tokio::test(start_paused = true)]
async fn geometry_changed_sends_one_resize() {
    let mut h = start(BridgeConfig::default(), Geometry::new(80, 24));

    h.surface_tx
        .send(SurfaceEvent::GeometryChanged(Geometry::new(132, 43)))
        .unwrap();

    assert_eq!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Resize(Geometry::new(132, 43))
    );
    settle().await;
    assert!(h.outgoing_rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn handshake_repeats_on_every_reconnect() {
    let mut h = start(BridgeConfig::default(), Geometry::new(80, 24));

    h.events_tx.send(TransportEvent::Connected).await.unwrap();
    assert!(matches!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Terminal { .. }
    ));
    assert!(matches!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Resize(_)
    ));

    h.events_tx.send(TransportEvent::Disconnected).await.unwrap();
    settle().await;

    h.events_tx.send(TransportEvent::Connected).await.unwrap();
    assert!(matches!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Terminal { .. }
    ));
    assert!(matches!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Resize(_)
    ));

    settle().await;
    assert!(h.outgoing_rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn grace_deadline_survives_early_disconnect() {
    let mut h = start(BridgeConfig::default(), Geometry::new(80, 24));

    h.events_tx.send(TransportEvent::Connected).await.unwrap();
    settle().await;
    h.events_tx.send(TransportEvent::Disconnected).await.unwrap();
    settle().await;
    assert_eq!(h.probe.blink(), Some(false));

    // The activation scheduled at connect time still fires after the
    // disconnect: a brief flicker, with the handshake queued for the
    // transport to flush on its next connection.
    assert!(matches!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Terminal { .. }
    ));
    assert_eq!(h.probe.blink(), Some(true));
}

#[tokio::test(start_paused = true)]
async fn handshake_reads_geometry_at_send_time() {
    let mut h = start(BridgeConfig::default(), Geometry::new(80, 24));

    h.events_tx.send(TransportEvent::Connected).await.unwrap();
    settle().await;

    // The surface recomputes its grid during the grace window; the
    // handshake must carry the fresh value, not the one seen at connect.
    h.probe.set_geometry(Geometry::new(120, 40));

    assert_eq!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Terminal {
            env: Default::default(),
            geometry: Geometry::new(120, 40),
        }
    );
    assert_eq!(
        h.outgoing_rx.recv().await.unwrap(),
        ClientEvent::Resize(Geometry::new(120, 40))
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_drops_all_subscriptions() {
    let h = start(BridgeConfig::default(), Geometry::new(80, 24));
    let Harness {
        handle,
        surface_tx,
        events_tx,
        mut outgoing_rx,
        ..
    } = h;

    handle.shutdown().await;

    // The event loop is gone: surface events go nowhere, the transport's
    // event receiver is dropped, and the outgoing queue has no senders.
    let _ = surface_tx.send(SurfaceEvent::Input("ls\n".to_string()));
    assert!(events_tx.send(TransportEvent::Connected).await.is_err());
    assert!(outgoing_rx.recv().await.is_none());
}
