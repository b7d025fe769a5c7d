//! Connection registry
//!
//! Pure bookkeeping of the currently open WebSocket connections. The
//! registry owns every entry; connections are removed the instant the
//! transport reports closure or a send fails, with no retry.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Server-side connection lifecycle state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closing,
    Closed,
}

/// One registered WebSocket connection.
///
/// The sender queues frames for the connection's socket task; the task
/// drains the queue and owns the actual transport.
#[derive(Clone, Debug)]
pub struct Connection {
    pub id: u64,
    pub state: ConnectionState,
    tx: mpsc::UnboundedSender<Message>,
}

impl Connection {
    pub fn new(id: u64, tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id,
            state: ConnectionState::Open,
            tx,
        }
    }

    /// Queue a frame for delivery on this connection's socket.
    ///
    /// Fails only when the socket task is gone, which callers treat as an
    /// implicit close signal.
    pub fn send(&self, msg: Message) -> Result<(), mpsc::error::SendError<Message>> {
        self.tx.send(msg)
    }
}

/// Tracks the set of currently open connections
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Mutex<Vec<Connection>>,
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a new connection
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Add a connection. Re-registering an existing id replaces the old
    /// entry rather than duplicating it.
    pub fn register(&self, conn: Connection) {
        let mut connections = self.connections.lock();
        connections.retain(|c| c.id != conn.id);
        connections.push(conn);
    }

    /// Remove a connection. Unknown ids are a no-op: a socket can be removed
    /// by more than one trigger (explicit close, send failure, socket error).
    pub fn unregister(&self, id: u64) {
        self.connections.lock().retain(|c| c.id != id);
    }

    /// Mark a connection as closing so broadcasts skip it while the close
    /// handshake drains
    pub fn mark_closing(&self, id: u64) {
        if let Some(conn) = self.connections.lock().iter_mut().find(|c| c.id == id) {
            conn.state = ConnectionState::Closing;
        }
    }

    /// Consistent copy of the current membership, in registration order.
    /// Connections added after the snapshot is taken miss whatever the
    /// caller is about to send.
    pub fn snapshot(&self) -> Vec<Connection> {
        self.connections.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_conn(id: u64) -> (Connection, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Connection::new(id, tx), rx)
    }

    #[test]
    fn test_register_replaces_same_id() {
        let registry = ConnectionRegistry::new();
        let (first, _rx1) = open_conn(7);
        let (second, _rx2) = open_conn(7);

        registry.register(first);
        registry.register(second);

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = open_conn(1);
        registry.register(conn);

        registry.unregister(99);
        registry.unregister(1);
        registry.unregister(1);

        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_preserves_registration_order() {
        let registry = ConnectionRegistry::new();
        let mut receivers = Vec::new();
        for id in [3, 1, 2] {
            let (conn, rx) = open_conn(id);
            registry.register(conn);
            receivers.push(rx);
        }

        let ids: Vec<u64> = registry.snapshot().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_mark_closing() {
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = open_conn(1);
        registry.register(conn);

        registry.mark_closing(1);

        assert_eq!(registry.snapshot()[0].state, ConnectionState::Closing);
    }
}
