//! WebSocket event broadcaster
//!
//! Delivers every committed mutation event to all open connections in the
//! registry. The broadcaster is constructed once by the composition root and
//! injected into the handlers that emit events; there is no global instance.

use std::sync::Arc;

use axum::extract::ws::Message;
use tracing::{debug, warn};

use crate::types::ArticleEvent;

use super::registry::{ConnectionRegistry, ConnectionState};

/// Fanout of mutation events to every live connection
#[derive(Clone)]
pub struct EventBroadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl EventBroadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver `event` to every open connection.
    ///
    /// The event is serialized once and sent to each member of a registry
    /// snapshot taken here. A failed send evicts that connection and never
    /// interrupts delivery to the rest; callers get nothing back either way.
    pub fn broadcast(&self, event: &ArticleEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "dropping unserializable event");
                return;
            }
        };

        let mut delivered = 0usize;
        for conn in self.registry.snapshot() {
            if conn.state != ConnectionState::Open {
                continue;
            }
            if conn.send(Message::Text(payload.clone())).is_ok() {
                delivered += 1;
            } else {
                // The socket task is gone; treat the failure as a close signal.
                self.registry.unregister(conn.id);
            }
        }

        debug!(
            article = event.article_id(),
            delivered, "event broadcast"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    use crate::api::websocket::registry::Connection;
    use crate::types::Article;

    #[tokio::test]
    async fn test_failed_send_evicts_without_aborting_delivery() {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = EventBroadcaster::new(registry.clone());

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();
        registry.register(Connection::new(1, tx1));
        registry.register(Connection::new(2, tx2));
        registry.register(Connection::new(3, tx3));
        drop(rx2); // transport already gone

        broadcaster.broadcast(&ArticleEvent::ArticleDeleted {
            id: "5".to_string(),
        });

        assert!(rx1.try_recv().is_ok());
        assert!(rx3.try_recv().is_ok());
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_broadcast_serializes_wire_format() {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = EventBroadcaster::new(registry.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(Connection::new(1, tx));

        broadcaster.broadcast(&ArticleEvent::ArticleCreated {
            article: Article::new("a1".to_string(), "A".to_string(), "x".to_string()),
        });

        let Message::Text(json) = rx.try_recv().unwrap() else {
            panic!("expected a text frame");
        };
        assert!(json.contains(r#""type":"article_created""#));
        assert!(json.contains(r#""id":"a1""#));
    }

    #[tokio::test]
    async fn test_closing_connections_are_skipped() {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = EventBroadcaster::new(registry.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(Connection::new(1, tx));
        registry.mark_closing(1);

        broadcaster.broadcast(&ArticleEvent::ArticleDeleted {
            id: "5".to_string(),
        });

        assert!(rx.try_recv().is_err());
        assert_eq!(registry.len(), 1);
    }
}
