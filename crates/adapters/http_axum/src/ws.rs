//! `WebSocket` endpoint for real-time device updates.
//!
//! Clients connect to `GET /ws` and receive an `initial_state` snapshot
//! followed by one `device_update` message per committed registry mutation,
//! whatever its origin. The subscription is created *before* the snapshot
//! is taken, so a delta can never precede its baseline. Any send failure
//! ends the connection and drops its bus receiver — one channel's failure
//! is invisible to the rest.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use domo_domain::event::StreamMessage;

use crate::state::AppState;

/// `GET /ws` — upgrade and begin streaming.
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Client frames we understand; anything else is ignored.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Subscribe,
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    debug!("stream subscriber connected");

    // Subscribe before snapshotting: a mutation landing in between shows up
    // in both the snapshot and the queue, but never only after the deltas.
    let mut rx = state.registry.subscribe();

    let snapshot = StreamMessage::InitialState {
        devices: state.registry.all(),
    };
    if send_message(&mut socket, &snapshot).await.is_err() {
        debug!("stream subscriber dropped before snapshot");
        return;
    }

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(update) => {
                    if send_message(&mut socket, &StreamMessage::from(update)).await.is_err() {
                        debug!("stream subscriber dropped (send failed)");
                        return;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "stream subscriber lagged, skipping ahead");
                }
                Err(RecvError::Closed) => {
                    debug!("update bus closed, ending stream");
                    return;
                }
            },
            frame = socket.recv() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Ok(ClientMessage::Subscribe) = serde_json::from_str(&text) {
                        let ack = StreamMessage::Subscribed {
                            message: "subscribed to device updates",
                        };
                        if send_message(&mut socket, &ack).await.is_err() {
                            return;
                        }
                    }
                }
                Some(Ok(Message::Ping(payload))) => {
                    if socket.send(Message::Pong(payload)).await.is_err() {
                        return;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    debug!("stream subscriber disconnected");
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    debug!(%err, "stream subscriber errored");
                    return;
                }
            },
        }
    }
}

async fn send_message(socket: &mut WebSocket, message: &StreamMessage) -> Result<(), axum::Error> {
    match serde_json::to_string(message) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(err) => {
            // skip the message rather than kill the stream
            warn!(%err, "failed to serialize stream message");
            Ok(())
        }
    }
}
