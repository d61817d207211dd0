//! Data stream relay: lossless, order-preserving, content-unmodified
//! bidirectional forwarding.
//!
//! Surface input becomes a `data` event on the transport; server `data`
//! events are written into the surface verbatim. The two directions are
//! independent streams; order within each direction is preserved by the
//! underlying channels. No buffering, batching, or transformation.

use tokio::sync::mpsc;
use tracing::trace;

use gritty_core::{ClientEvent, GrittyError, GrittyResult};

use crate::surface::DisplaySurface;

/// The surface produced input: forward it unconditionally.
pub async fn forward_input(
    outgoing: &mpsc::Sender<ClientEvent>,
    payload: String,
) -> GrittyResult<()> {
    trace!(len = payload.len(), "input -> transport");
    outgoing
        .send(ClientEvent::Data(payload))
        .await
        .map_err(|_| GrittyError::Transport("transport task gone".into()))
}

/// The server sent output: write it into the surface verbatim.
pub fn forward_output(surface: &mut dyn DisplaySurface, payload: &str) -> GrittyResult<()> {
    trace!(len = payload.len(), "transport -> surface");
    surface.write(payload)
}
