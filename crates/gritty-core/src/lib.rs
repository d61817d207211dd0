//! gritty-core: shared protocol vocabulary for the gritty terminal protocol.
//!
//! Defines the named wire events exchanged between a gritty client and
//! server, the JSON packet codec, the transport reconnect policy, and the
//! error types shared by the client crates.

pub mod codec;
pub mod error;
pub mod messages;
pub mod policy;

pub use error::{GrittyError, GrittyResult};
pub use messages::{ClientEvent, Geometry, ServerEvent};
pub use policy::ReconnectPolicy;
