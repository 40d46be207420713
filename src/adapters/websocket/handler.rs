//! WebSocket upgrade handler for relay connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Register with the relay and receive an outbox
//! 2. Forward outbox notifications to the client
//! 3. Decode client frames into relay events
//! 4. Dispatch a disconnect when either side ends

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};

use crate::adapters::http::AppState;
use crate::domain::foundation::ConnectionId;

use super::{
    messages::{ClientMessage, ServerMessage},
    relay::RelayHandle,
};

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let relay = state.relay.clone();
    ws.max_message_size(state.max_message_bytes)
        .on_upgrade(move |socket| handle_socket(socket, relay))
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection.
async fn handle_socket(socket: WebSocket, relay: RelayHandle) {
    let (connection, mut outbox) = match relay.connect().await {
        Ok(registered) => registered,
        Err(e) => {
            tracing::error!("Could not register connection: {}", e);
            return;
        }
    };

    let (mut sender, mut receiver) = socket.split();

    // Forward relay notifications to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = outbox.recv().await {
            if let Err(e) = send_message(&mut sender, &msg).await {
                tracing::debug!(
                    connection_id = %connection,
                    "Send error, closing connection: {}",
                    e
                );
                break;
            }
        }
    });

    // Decode client frames into relay events
    let inbound_relay = relay.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    if !handle_text(&inbound_relay, connection, &text).await {
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(
                        connection_id = %connection,
                        "Received unsupported binary message"
                    );
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Handled automatically by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    if let Err(e) = relay.disconnect(connection).await {
        tracing::warn!(connection_id = %connection, "Disconnect not processed: {}", e);
    }
}

/// Decode and dispatch one text frame.
///
/// Returns false once the relay has stopped and the connection should end.
async fn handle_text(relay: &RelayHandle, connection: ConnectionId, text: &str) -> bool {
    let client_msg = match ClientMessage::parse(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!(connection_id = %connection, "Ignoring frame: {}", e);
            return true;
        }
    };

    match relay.dispatch(client_msg.into_event(connection)).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(connection_id = %connection, "Dispatch failed: {}", e);
            false
        }
    }
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}
