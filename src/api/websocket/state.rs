//! Shared application state

use std::sync::Arc;

use crate::store::{ArticleStore, FileStore};

use super::broadcaster::EventBroadcaster;
use super::registry::ConnectionRegistry;

/// State shared by every HTTP and WebSocket handler
pub struct AppState {
    /// The article store
    pub store: Arc<ArticleStore>,

    /// Attachment storage
    pub files: FileStore,

    /// Registry of open WebSocket connections
    pub registry: Arc<ConnectionRegistry>,

    /// Broadcaster delivering mutation events to the registry
    pub broadcaster: EventBroadcaster,
}

impl AppState {
    /// Wire the state from parts built by the composition root. The registry
    /// handed in must be the one the broadcaster delivers to.
    pub fn new(
        store: Arc<ArticleStore>,
        files: FileStore,
        registry: Arc<ConnectionRegistry>,
        broadcaster: EventBroadcaster,
    ) -> Self {
        Self {
            store,
            files,
            registry,
            broadcaster,
        }
    }
}
