//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::registry::Connection;
use super::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one client connection until the transport goes away
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let id = state.registry.next_id();
    let (tx, mut rx) = mpsc::unbounded_channel();
    state.registry.register(Connection::new(id, tx));
    debug!(conn = id, "websocket client connected");

    loop {
        tokio::select! {
            // Fanout frames queued for this connection
            outbound = rx.recv() => {
                match outbound {
                    Some(msg) => {
                        if socket.send(msg).await.is_err() {
                            break; // Client disconnected
                        }
                    }
                    None => break, // Evicted by the broadcaster
                }
            }

            // Inbound frames. This is a push-only channel, so only protocol
            // frames matter; text and binary payloads are ignored.
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Ping(data))) => {
                        let _ = socket.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        state.registry.mark_closing(id);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(conn = id, error = %err, "websocket error");
                        break;
                    }
                    None => break, // Client disconnected
                }
            }
        }
    }

    state.registry.unregister(id);
    debug!(conn = id, "websocket client disconnected");
}
