//! Transport seam for the duplex connection.
//!
//! The transport collaborator owns dialing, wire framing, and reconnection;
//! the bridge only observes connect/disconnect/data events and queues
//! outgoing client events. [`websocket::connect`] builds the real
//! transport; custom transports plug in through
//! [`TransportHandle::from_parts`].

pub mod websocket;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use gritty_core::{ClientEvent, GrittyError, GrittyResult};

/// Connection-level events observed by the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The connection (or a reconnection) was established.
    Connected,
    /// The connection dropped. The transport keeps retrying on its own.
    Disconnected,
    /// A server `data` event arrived.
    Data(String),
}

/// Handle to a live transport: an outgoing event queue plus the stream of
/// connection events. Dropping every sender ends the transport task.
pub struct TransportHandle {
    outgoing: mpsc::Sender<ClientEvent>,
    events: mpsc::Receiver<TransportEvent>,
    supervisor: Option<JoinHandle<()>>,
}

impl TransportHandle {
    /// Assemble a handle from raw channels. Intended for tests and for
    /// callers supplying their own transport implementation.
    pub fn from_parts(
        outgoing: mpsc::Sender<ClientEvent>,
        events: mpsc::Receiver<TransportEvent>,
    ) -> Self {
        Self {
            outgoing,
            events,
            supervisor: None,
        }
    }

    pub(crate) fn with_supervisor(
        outgoing: mpsc::Sender<ClientEvent>,
        events: mpsc::Receiver<TransportEvent>,
        supervisor: JoinHandle<()>,
    ) -> Self {
        Self {
            outgoing,
            events,
            supervisor: Some(supervisor),
        }
    }

    /// Queue a client event for sending. Events queued while the transport
    /// is between connections are delivered, in order, once it reconnects.
    pub async fn send(&self, event: ClientEvent) -> GrittyResult<()> {
        self.outgoing
            .send(event)
            .await
            .map_err(|_| GrittyError::Transport("transport task gone".into()))
    }

    /// A clone of the outgoing queue, for caller-level extension.
    pub fn sender(&self) -> mpsc::Sender<ClientEvent> {
        self.outgoing.clone()
    }

    /// Receive the next connection event. `None` means the transport gave
    /// up or was torn down.
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        mpsc::Sender<ClientEvent>,
        mpsc::Receiver<TransportEvent>,
        Option<JoinHandle<()>>,
    ) {
        (self.outgoing, self.events, self.supervisor)
    }
}
