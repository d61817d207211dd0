//! Resize synchronizer: keeps the server's notion of terminal geometry
//! consistent with the local display surface.

use tokio::sync::mpsc;
use tracing::debug;

use gritty_core::{ClientEvent, Geometry, GrittyError, GrittyResult};

use crate::surface::DisplaySurface;

/// The surface recomputed its cell grid: forward the new geometry. One
/// `resize` event per occurrence; the geometry travels inside the event
/// itself, so the last message always reflects the latest grid.
pub async fn on_geometry_changed(
    outgoing: &mpsc::Sender<ClientEvent>,
    geometry: Geometry,
) -> GrittyResult<()> {
    debug!(cols = geometry.cols, rows = geometry.rows, "geometry changed");
    outgoing
        .send(ClientEvent::Resize(geometry))
        .await
        .map_err(|_| GrittyError::Transport("transport task gone".into()))
}

/// The viewport resized: refit the surface to its container. The refit
/// triggers the surface's own geometry-changed event, which is the only
/// path by which viewport resizes reach the transport.
pub fn on_viewport_resize(surface: &mut dyn DisplaySurface) -> GrittyResult<()> {
    surface.fit()
}
