//! Article Hub
//!
//! A small content-management service: clients create, read, update, and
//! delete articles, optionally with attached files, and every connected
//! client observes mutations made by any other client without polling.
//!
//! # Features
//!
//! - **Real-time fanout**: every committed mutation is pushed to all open
//!   WebSocket connections as one JSON event
//! - **Resilient client**: connection manager with automatic reconnection,
//!   event reconciliation into cached state, and a TTL-bounded notification
//!   queue
//! - **File-backed store**: one JSON document per article, loaded at startup
//! - **Attachments**: validated uploads (JPG, PNG, PDF) served back under
//!   `/uploads`
//!
//! # Modules
//!
//! - `types`: core data structures (`Article`, `ArticleEvent`)
//! - `store`: article store and attachment storage
//! - `api`: REST endpoints, WebSocket registry/broadcaster/handler
//! - `client`: native client (connection manager, cache, notifications, REST)
//! - `config`: environment-based server settings
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use article_hub::api::http::create_router;
//! use article_hub::api::websocket::broadcaster::EventBroadcaster;
//! use article_hub::api::websocket::registry::ConnectionRegistry;
//! use article_hub::api::websocket::state::AppState;
//! use article_hub::store::{ArticleStore, FileStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(ArticleStore::open("data")?);
//! let files = FileStore::open("uploads")?;
//! let registry = Arc::new(ConnectionRegistry::new());
//! let broadcaster = EventBroadcaster::new(registry.clone());
//! let state = Arc::new(AppState::new(store, files, registry, broadcaster));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, create_router(state)).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod store;
pub mod types;

// Re-export commonly used items at crate root
pub use client::{ArticleApi, ArticleCache, ConnectionManager, NotificationQueue};
pub use store::{ArticleStore, FileStore};
pub use types::{Article, ArticleEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
