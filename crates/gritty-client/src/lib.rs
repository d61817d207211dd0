//! gritty-client: session bridge between a terminal display surface and a
//! remote shell carried over a gritty duplex connection.
//!
//! The bridge dials the transport, performs the delayed `terminal`/`resize`
//! handshake on every successful connect, relays data in both directions
//! verbatim, keeps the server's notion of terminal geometry in step with
//! the surface, and reflects connection health through the surface's cursor
//! blink mode.
//!
//! # Quick start
//!
//! ```no_run
//! use gritty_client::{BridgeConfig, DisplaySurface, SurfaceEvent};
//!
//! # async fn example(
//! #     surface: Box<dyn DisplaySurface>,
//! #     surface_rx: tokio::sync::mpsc::UnboundedReceiver<SurfaceEvent>,
//! #     viewport_rx: tokio::sync::mpsc::UnboundedReceiver<()>,
//! # ) {
//! let handle = gritty_client::open(
//!     BridgeConfig::default(),
//!     "http://localhost:1337",
//!     surface,
//!     surface_rx,
//!     viewport_rx,
//! );
//!
//! // ... the user drives the surface; the bridge does the rest ...
//!
//! handle.shutdown().await;
//! # }
//! ```

pub mod bridge;
pub mod config;
pub mod indicator;
pub mod lifecycle;
pub mod relay;
pub mod resize;
pub mod surface;
pub mod transport;

// Re-export primary public types.
pub use bridge::{open, open_with_transport, BridgeHandle};
pub use config::BridgeConfig;
pub use indicator::HealthIndicator;
pub use lifecycle::{LifecycleManager, SessionState, DISCONNECT_NOTICE};
pub use surface::{DisplaySurface, SurfaceEvent, SurfaceOptions};
pub use transport::{TransportEvent, TransportHandle};

// Re-export gritty-core types for convenience.
pub use gritty_core::{ClientEvent, Geometry, GrittyError, GrittyResult, ReconnectPolicy};
