//! Client connection manager
//!
//! Owns one logical WebSocket connection to the server: establishes it,
//! observes failures and closures, and schedules reconnection after a fixed
//! delay until stopped. All lifecycle transitions happen on a single driver
//! task, so at most one connection attempt is ever in flight.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::types::ArticleEvent;

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Lifecycle state of the managed connection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Open,
}

/// Delay between a connection drop and the next attempt
pub const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Manages one resilient WebSocket connection.
///
/// Received events are fanned out to every subscriber in receipt order.
/// Events emitted by the server while the connection is down are permanently
/// lost; callers that need to heal a gap re-fetch through the REST surface.
///
/// `stop` is final: it cancels any pending reconnect and the manager never
/// connects again. Build a new manager to start over.
pub struct ConnectionManager {
    url: String,
    reconnect_delay: Duration,
    state_tx: watch::Sender<ConnectionState>,
    event_tx: broadcast::Sender<ArticleEvent>,
    shutdown: CancellationToken,
    driver: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionManager {
    /// Manager for `url` (a `ws://.../ws` endpoint) with the default delay
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_reconnect_delay(url, RECONNECT_DELAY)
    }

    pub fn with_reconnect_delay(url: impl Into<String>, reconnect_delay: Duration) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let (event_tx, _) = broadcast::channel(256);
        Self {
            url: url.into(),
            reconnect_delay,
            state_tx,
            event_tx,
            shutdown: CancellationToken::new(),
            driver: parking_lot::Mutex::new(None),
        }
    }

    /// Begin connecting. Spawns the driver task; calling `start` again while
    /// it is running is a no-op.
    pub fn start(&self) {
        let mut driver = self.driver.lock();
        if driver.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let task = DriverTask {
            url: self.url.clone(),
            reconnect_delay: self.reconnect_delay,
            state_tx: self.state_tx.clone(),
            event_tx: self.event_tx.clone(),
            shutdown: self.shutdown.clone(),
        };
        *driver = Some(tokio::spawn(task.run()));
    }

    /// Stop for good: cancels any pending scheduled reconnect and closes the
    /// socket. The only supported cancellation path.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    /// Observe lifecycle transitions
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Receive every event pushed by the server, in receipt order
    pub fn subscribe(&self) -> broadcast::Receiver<ArticleEvent> {
        self.event_tx.subscribe()
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// The single task that owns every state transition
struct DriverTask {
    url: String,
    reconnect_delay: Duration,
    state_tx: watch::Sender<ConnectionState>,
    event_tx: broadcast::Sender<ArticleEvent>,
    shutdown: CancellationToken,
}

impl DriverTask {
    async fn run(self) {
        loop {
            self.state_tx.send_replace(ConnectionState::Connecting);

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                attempt = connect_async(self.url.as_str()) => match attempt {
                    Ok((socket, _)) => {
                        debug!(url = %self.url, "connection open");
                        self.state_tx.send_replace(ConnectionState::Open);
                        self.pump(socket).await;
                        debug!(url = %self.url, "connection lost");
                    }
                    Err(err) => {
                        warn!(url = %self.url, error = %err, "connection attempt failed");
                    }
                }
            }

            self.state_tx.send_replace(ConnectionState::Disconnected);

            if self.shutdown.is_cancelled() {
                break;
            }
            // Graceful close and error look the same from here: wait out the
            // fixed delay, then try again.
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = sleep(self.reconnect_delay) => {}
            }
        }

        self.state_tx.send_replace(ConnectionState::Disconnected);
    }

    /// Forward inbound frames to subscribers until the transport goes away
    async fn pump(&self, mut socket: WsStream) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    let _ = socket.close(None).await;
                    return;
                }
                frame = socket.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ArticleEvent>(text.as_str()) {
                            Ok(event) => {
                                let _ = self.event_tx.send(event);
                            }
                            // A malformed push is discarded; it must not
                            // tear down the connection.
                            Err(err) => {
                                warn!(error = %err, "discarding malformed push message");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => return,
                    Some(Ok(_)) => {} // Ping/Pong handled by the protocol layer
                    Some(Err(err)) => {
                        warn!(error = %err, "websocket read failed");
                        return;
                    }
                    None => return,
                }
            }
        }
    }
}
