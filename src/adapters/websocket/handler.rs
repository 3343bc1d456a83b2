//! WebSocket upgrade handler for real-time chat connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Register the connection with the hub
//! 2. Forward queued server events to the socket
//! 3. Decode client frames and hand them to the hub or the message router
//! 4. Deregister on disconnect
//!
//! A frame that fails to decode or route is logged and dropped; it never
//! closes the connection. When the socket goes away, frames not yet read
//! are abandoned but a send already being routed runs to completion.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::application::handlers::MessageRouter;
use crate::domain::chat::{ChatError, RoomId};
use crate::domain::foundation::ConnectionId;

use super::messages::{ClientEvent, ServerEvent, SignalRoute};
use super::rooms::RoomHub;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub hub: Arc<RoomHub>,
    pub router: Arc<MessageRouter>,
}

impl WebSocketState {
    pub fn new(hub: Arc<RoomHub>, router: Arc<MessageRouter>) -> Self {
        Self { hub, router }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs for the lifetime of one connection.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();
    let (connection, mut outbound) = state.hub.connect().await;

    tracing::debug!(connection_id = %connection, "websocket connected");

    // Forward queued events to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            if let Err(e) = send_event(&mut sender, &event).await {
                tracing::debug!(connection_id = %connection, "Send error, closing connection: {}", e);
                break;
            }
        }
    });

    // Handle incoming frames until the client leaves or the send half closes
    let recv_state = state.clone();
    let stop_reading = CancellationToken::new();
    let recv_stop = stop_reading.clone();
    let mut recv_task = tokio::spawn(async move {
        loop {
            let result = tokio::select! {
                _ = recv_stop.cancelled() => break,
                frame = receiver.next() => match frame {
                    Some(result) => result,
                    None => break,
                },
            };
            match result {
                Ok(Message::Text(text)) => {
                    handle_client_text(&recv_state, connection, &text).await;
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(connection_id = %connection, "Received unsupported binary message");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Protocol-level keepalive, answered by axum
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

    let send_closed_first = tokio::select! {
        _ = &mut send_task => true,
        _ = &mut recv_task => false,
    };
    if send_closed_first {
        stop_reading.cancel();
        if let Err(e) = recv_task.await {
            tracing::warn!(connection_id = %connection, error = %e, "Receive task failed");
        }
    } else {
        send_task.abort();
    }

    state.hub.disconnect(&connection).await;
    tracing::debug!(connection_id = %connection, "websocket disconnected");
}

/// Decode and act on one text frame from `connection`.
pub async fn handle_client_text(state: &WebSocketState, connection: ConnectionId, text: &str) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(connection_id = %connection, error = %e, "Ignoring unparseable client frame");
            return;
        }
    };
    let event_name = event.name();

    match event {
        ClientEvent::Join(payload) => match RoomId::new(payload.room) {
            Ok(room) => {
                state.hub.join(connection, room, payload.username).await;
            }
            Err(e) => {
                tracing::warn!(connection_id = %connection, event = event_name, error = %e, "Join rejected");
            }
        },
        ClientEvent::Data(payload) => match SignalRoute::from_payload(&payload) {
            Some(route) => {
                state.hub.relay_signal(connection, &route.room, payload).await;
            }
            None => {
                tracing::debug!(connection_id = %connection, "Ignoring signal without known type or room");
            }
        },
        other => {
            let router_event = match other.into_router_event() {
                Ok(Some(router_event)) => router_event,
                Ok(None) => return,
                Err(e) => {
                    log_dropped(connection, event_name, &ChatError::from(e));
                    return;
                }
            };

            // Detached: once routing starts it finishes even if this
            // connection's task is cancelled.
            let router = state.router.clone();
            let dispatch = tokio::spawn(async move {
                if let Err(e) = router.dispatch(Some(connection), router_event).await {
                    log_dropped(connection, event_name, &e);
                }
            });
            if let Err(e) = dispatch.await {
                tracing::error!(connection_id = %connection, event = event_name, error = %e, "Chat dispatch task failed");
            }
        }
    }
}

fn log_dropped(connection: ConnectionId, event_name: &'static str, error: &ChatError) {
    tracing::warn!(
        connection_id = %connection,
        event = event_name,
        code = %error.code(),
        error = %error,
        "Chat event dropped"
    );
}

/// Send a JSON event over the WebSocket.
async fn send_event(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    match event.to_json() {
        Ok(json) => sender.send(Message::Text(json)).await,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize server event");
            Ok(())
        }
    }
}

/// Create axum router for the WebSocket endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(websocket_router())
///     .with_state(ws_state);
/// ```
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route("/ws", get(ws_handler))
}
