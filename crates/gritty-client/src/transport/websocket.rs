//! WebSocket transport with automatic reconnection.
//!
//! Dials the endpoint, relays outgoing client events as JSON text frames
//! and incoming text frames as `TransportEvent::Data`, and redials with
//! jittered truncated-exponential backoff under the configured policy when
//! the connection drops. Events queued while between connections are
//! flushed, in order, after the next successful dial.

use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use gritty_core::codec::{decode_server_event, encode_client_event};
use gritty_core::{ClientEvent, ReconnectPolicy, ServerEvent};

use super::{TransportEvent, TransportHandle};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a pump over one connection ended.
enum PumpEnd {
    /// Every handle sender was dropped; stop the supervisor entirely.
    HandleDropped,
    /// The connection was lost; the supervisor should redial.
    ConnectionLost,
}

/// Open a reconnecting WebSocket transport to `url`.
///
/// Returns immediately; the first dial happens on the supervisor task and
/// is announced through `TransportEvent::Connected` like any reconnection.
/// Dial failures are never surfaced as errors — they simply feed the retry
/// loop, bounded by `policy`.
pub fn connect(url: &str, policy: ReconnectPolicy) -> TransportHandle {
    let (outgoing_tx, outgoing_rx) = mpsc::channel::<ClientEvent>(256);
    let (event_tx, event_rx) = mpsc::channel::<TransportEvent>(256);

    let supervisor = tokio::spawn(supervise(url.to_string(), policy, outgoing_rx, event_tx));

    TransportHandle::with_supervisor(outgoing_tx, event_rx, supervisor)
}

/// Dial-and-redial loop owning the connection for its whole lifetime.
async fn supervise(
    url: String,
    policy: ReconnectPolicy,
    mut outgoing_rx: mpsc::Receiver<ClientEvent>,
    events: mpsc::Sender<TransportEvent>,
) {
    let mut attempt: u32 = 0;

    loop {
        if attempt > 0 {
            if attempt >= policy.max_attempts {
                tracing::error!(attempt, "giving up after exhausting reconnection attempts");
                break;
            }
            let delay = jittered(policy.delay_for(attempt), policy.randomization)
                .min(policy.delay_cap);
            tracing::debug!(?delay, attempt, "waiting before reconnect");
            tokio::time::sleep(delay).await;
        }

        let ws = match connect_async(url.as_str()).await {
            Ok((ws, _response)) => ws,
            Err(e) => {
                tracing::warn!(%url, "dial failed: {e}");
                attempt = attempt.saturating_add(1);
                continue;
            }
        };

        attempt = 0;
        tracing::info!(%url, "connected");
        if events.send(TransportEvent::Connected).await.is_err() {
            break;
        }

        match pump(ws, &mut outgoing_rx, &events).await {
            PumpEnd::HandleDropped => break,
            PumpEnd::ConnectionLost => {
                if events.send(TransportEvent::Disconnected).await.is_err() {
                    break;
                }
                attempt = 1;
            }
        }
    }

    tracing::debug!("transport supervisor ended");
}

/// Relay frames over one live connection until it drops.
async fn pump(
    ws: WsStream,
    outgoing_rx: &mut mpsc::Receiver<ClientEvent>,
    events: &mpsc::Sender<TransportEvent>,
) -> PumpEnd {
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            maybe = outgoing_rx.recv() => {
                let Some(event) = maybe else {
                    let _ = sink.send(Message::Close(None)).await;
                    return PumpEnd::HandleDropped;
                };
                let packet = match encode_client_event(&event) {
                    Ok(packet) => packet,
                    Err(e) => {
                        tracing::warn!("failed to encode {} event: {e}", event.name());
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(packet)).await {
                    tracing::warn!("write error: {e}");
                    return PumpEnd::ConnectionLost;
                }
            }

            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match decode_server_event(&text) {
                            Ok(ServerEvent::Data(data)) => {
                                if events.send(TransportEvent::Data(data)).await.is_err() {
                                    return PumpEnd::HandleDropped;
                                }
                            }
                            Err(e) => tracing::warn!("bad server packet: {e}"),
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            return PumpEnd::ConnectionLost;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!("connection closed by peer");
                        return PumpEnd::ConnectionLost;
                    }
                    // Binary frames, pongs etc. are not part of the protocol.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("read error: {e}");
                        return PumpEnd::ConnectionLost;
                    }
                }
            }
        }
    }
}

/// Spread `base` uniformly inside `base * (1 ± randomization / 2)`.
fn jittered(base: Duration, randomization: f64) -> Duration {
    if randomization <= 0.0 {
        return base;
    }
    let spread = randomization.min(1.0);
    let factor = 1.0 + rand::thread_rng().gen_range(-spread..=spread) / 2.0;
    base.mul_f64(factor)
}
