//! Bridge configuration.
//!
//! Recognized options mirror the gritty widget contract — `socket_path`
//! (transport mount sub-path), `prefix` (server namespace, default
//! `/gritty`), and `env` (passed through to the handshake unmodified) —
//! plus the knobs a native client exposes: the grace delay, the reconnect
//! policy, and surface construction options. Absent fields fall back to
//! their defaults; nothing is validated here.

use std::collections::HashMap;
use std::time::Duration;

use gritty_core::ReconnectPolicy;

use crate::surface::SurfaceOptions;

/// Configuration for opening a session bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Mount point of the transport endpoint on the host.
    pub socket_path: String,
    /// Server namespace prefix.
    pub prefix: String,
    /// Environment mapping passed through, unmodified, in the `terminal`
    /// handshake. Selection and sanitization are the caller's concern.
    pub env: HashMap<String, String>,
    /// Pause between a transport connect and indicator activation plus
    /// handshake, accommodating the server-side auth check.
    pub grace_delay: Duration,
    /// Reconnection bounds handed to the transport.
    pub policy: ReconnectPolicy,
    /// Options consumed by surface constructors.
    pub surface: SurfaceOptions,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            socket_path: String::new(),
            prefix: "/gritty".to_string(),
            env: HashMap::new(),
            grace_delay: Duration::from_millis(1000),
            policy: ReconnectPolicy::default(),
            surface: SurfaceOptions::default(),
        }
    }
}

impl BridgeConfig {
    /// Dial URL for `origin`: the transport mounts at
    /// `<socket_path>/socket.io` and the session namespace at `<prefix>`.
    pub fn endpoint(&self, origin: &str) -> String {
        let origin = origin.trim_end_matches('/');
        format!("{origin}{}/socket.io{}", self.socket_path, self.prefix)
    }
}

/// Translate an `http(s)` origin into its `ws(s)` counterpart. Origins
/// already carrying a WebSocket scheme pass through untouched.
pub fn ws_origin(origin: &str) -> String {
    if let Some(rest) = origin.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = origin.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        origin.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.socket_path, "");
        assert_eq!(config.prefix, "/gritty");
        assert!(config.env.is_empty());
        assert_eq!(config.grace_delay, Duration::from_millis(1000));
    }

    #[test]
    fn endpoint_with_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.endpoint("ws://localhost:1337"),
            "ws://localhost:1337/socket.io/gritty"
        );
    }

    #[test]
    fn endpoint_with_socket_path_and_prefix() {
        let config = BridgeConfig {
            socket_path: "/app".to_string(),
            prefix: "/console".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint("wss://example.com/"),
            "wss://example.com/app/socket.io/console"
        );
    }

    #[test]
    fn origin_scheme_translation() {
        assert_eq!(ws_origin("http://host:1337"), "ws://host:1337");
        assert_eq!(ws_origin("https://host"), "wss://host");
        assert_eq!(ws_origin("ws://host"), "ws://host");
    }
}
