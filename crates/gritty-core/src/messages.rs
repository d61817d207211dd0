//! Wire events for the gritty protocol.
//!
//! Event names and payload shapes follow the gritty server contract:
//! `terminal` (session handshake), `resize`, and `data` flow client→server;
//! `data` flows server→client. Connect and disconnect are transport-level
//! signals, not wire events.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Terminal size in character columns and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub cols: u16,
    pub rows: u16,
}

impl Geometry {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

/// Events sent from the client to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Session handshake: environment mapping plus current geometry.
    ///
    /// The server also consumes this as the session-initiation signal,
    /// independent of geometry updates, so it is sent on every successful
    /// connect even though an explicit `Resize` follows immediately.
    Terminal {
        env: HashMap<String, String>,
        geometry: Geometry,
    },
    /// The authoritative terminal geometry changed.
    Resize(Geometry),
    /// Raw input produced by the display surface, forwarded verbatim.
    Data(String),
}

impl ClientEvent {
    /// Wire event name for this variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Terminal { .. } => "terminal",
            Self::Resize(_) => "resize",
            Self::Data(_) => "data",
        }
    }
}

/// Events received from the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Raw output to write into the display surface verbatim.
    Data(String),
}
