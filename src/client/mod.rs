//! Native client for the article service
//!
//! Three cooperating pieces, wired by the application:
//!
//! - [`ConnectionManager`]: one resilient WebSocket connection with
//!   automatic reconnection and an event subscription point
//! - [`ArticleCache`]: reconciles pushed events into locally cached state
//! - [`NotificationQueue`]: TTL-bounded display queue fed by the same stream
//!
//! plus [`ArticleApi`], a typed REST client for direct CRUD calls whose
//! results go through the same cache merge rules as pushed events.
//!
//! # Example
//!
//! ```no_run
//! use article_hub::client::{ArticleApi, ArticleCache, ConnectionManager};
//! use article_hub::types::ArticleEvent;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ArticleApi::new("http://localhost:3000");
//! let manager = ConnectionManager::new("ws://localhost:3000/ws");
//! let mut events = manager.subscribe();
//! manager.start();
//!
//! let mut cache = ArticleCache::new();
//! cache.reset(api.list().await?);
//!
//! while let Ok(event) = events.recv().await {
//!     cache.apply(&event);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod connection;
pub mod notifications;

pub use api::{ArticleApi, ArticleChanges, Attachment, ClientError};
pub use cache::ArticleCache;
pub use connection::{ConnectionManager, ConnectionState, RECONNECT_DELAY};
pub use notifications::{run_expiry, NotificationItem, NotificationQueue, NOTIFICATION_TTL};
