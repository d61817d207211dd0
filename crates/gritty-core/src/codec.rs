//! Named-event JSON packets for the gritty wire protocol.
//!
//! Each transport text frame carries exactly one packet: a two-element JSON
//! array of event name and payload, e.g. `["resize",{"cols":80,"rows":24}]`
//! or `["data","ls\n"]`.

use serde_json::{json, Value};

use crate::error::{GrittyError, GrittyResult};
use crate::messages::{ClientEvent, Geometry, ServerEvent};

/// Encode a client event into a JSON packet string.
pub fn encode_client_event(event: &ClientEvent) -> GrittyResult<String> {
    let payload = match event {
        ClientEvent::Terminal { env, geometry } => json!({
            "env": env,
            "cols": geometry.cols,
            "rows": geometry.rows,
        }),
        ClientEvent::Resize(g) => json!({ "cols": g.cols, "rows": g.rows }),
        ClientEvent::Data(data) => Value::String(data.clone()),
    };
    Ok(serde_json::to_string(&json!([event.name(), payload]))?)
}

/// Decode a JSON packet into a client event (server side and tests).
pub fn decode_client_event(packet: &str) -> GrittyResult<ClientEvent> {
    let (name, payload) = split_packet(packet)?;
    match name.as_str() {
        "terminal" => {
            let env = serde_json::from_value(
                payload.get("env").cloned().unwrap_or_else(|| json!({})),
            )?;
            let geometry = geometry_of(&payload)?;
            Ok(ClientEvent::Terminal { env, geometry })
        }
        "resize" => Ok(ClientEvent::Resize(geometry_of(&payload)?)),
        "data" => Ok(ClientEvent::Data(string_payload(payload)?)),
        other => Err(GrittyError::Codec(format!(
            "unknown client event '{other}'"
        ))),
    }
}

/// Decode a JSON packet into a server event.
pub fn decode_server_event(packet: &str) -> GrittyResult<ServerEvent> {
    let (name, payload) = split_packet(packet)?;
    match name.as_str() {
        "data" => Ok(ServerEvent::Data(string_payload(payload)?)),
        other => Err(GrittyError::Codec(format!(
            "unknown server event '{other}'"
        ))),
    }
}

fn split_packet(packet: &str) -> GrittyResult<(String, Value)> {
    let value: Value = serde_json::from_str(packet)?;
    let Value::Array(parts) = value else {
        return Err(GrittyError::Codec("packet must be a JSON array".into()));
    };
    let [name, payload] = <[Value; 2]>::try_from(parts)
        .map_err(|_| GrittyError::Codec("packet must be a [name, payload] pair".into()))?;
    let Value::String(name) = name else {
        return Err(GrittyError::Codec("event name must be a string".into()));
    };
    Ok((name, payload))
}

fn geometry_of(payload: &Value) -> GrittyResult<Geometry> {
    serde_json::from_value(payload.clone())
        .map_err(|e| GrittyError::Codec(format!("bad geometry payload: {e}")))
}

fn string_payload(payload: Value) -> GrittyResult<String> {
    match payload {
        Value::String(s) => Ok(s),
        other => Err(GrittyError::Codec(format!(
            "data payload must be a string, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn encode_terminal_event() {
        let mut env = HashMap::new();
        env.insert("TERM".to_string(), "xterm-256color".to_string());
        let event = ClientEvent::Terminal {
            env,
            geometry: Geometry::new(80, 24),
        };

        let packet = encode_client_event(&event).unwrap();
        let value: Value = serde_json::from_str(&packet).unwrap();
        assert_eq!(
            value,
            json!(["terminal", {"env": {"TERM": "xterm-256color"}, "cols": 80, "rows": 24}])
        );
    }

    #[test]
    fn encode_resize_event() {
        let packet = encode_client_event(&ClientEvent::Resize(Geometry::new(120, 40))).unwrap();
        assert_eq!(packet, r#"["resize",{"cols":120,"rows":40}]"#);
    }

    #[test]
    fn encode_data_event() {
        let packet = encode_client_event(&ClientEvent::Data("ls\n".into())).unwrap();
        assert_eq!(packet, "[\"data\",\"ls\\n\"]");
    }

    #[test]
    fn decode_client_terminal() {
        let packet = r#"["terminal",{"env":{"TERM":"xterm"},"cols":80,"rows":24}]"#;
        let event = decode_client_event(packet).unwrap();
        let ClientEvent::Terminal { env, geometry } = event else {
            panic!("expected terminal event");
        };
        assert_eq!(env.get("TERM").map(String::as_str), Some("xterm"));
        assert_eq!(geometry, Geometry::new(80, 24));
    }

    #[test]
    fn decode_client_terminal_without_env() {
        let packet = r#"["terminal",{"cols":80,"rows":24}]"#;
        let event = decode_client_event(packet).unwrap();
        let ClientEvent::Terminal { env, .. } = event else {
            panic!("expected terminal event");
        };
        assert!(env.is_empty());
    }

    #[test]
    fn decode_server_data() {
        let event = decode_server_event("[\"data\",\"hello\\n\"]").unwrap();
        assert_eq!(event, ServerEvent::Data("hello\n".into()));
    }

    #[test]
    fn decode_rejects_unknown_event() {
        assert!(decode_server_event(r#"["bogus",{}]"#).is_err());
        assert!(decode_client_event(r#"["bogus",{}]"#).is_err());
    }

    #[test]
    fn decode_rejects_malformed_packets() {
        assert!(decode_server_event("not json").is_err());
        assert!(decode_server_event(r#"{"event":"data"}"#).is_err());
        assert!(decode_server_event(r#"["data"]"#).is_err());
        assert!(decode_server_event(r#"["data",42]"#).is_err());
        assert!(decode_client_event(r#"[42,"payload"]"#).is_err());
    }
}
