//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use super::rest::articles;
use super::websocket::{handler::ws_handler, state::AppState};

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let uploads = ServeDir::new(state.files.upload_dir());

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        // Article CRUD
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/articles/:id",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        // Stored attachments
        .nest_service("/uploads", uploads)
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::websocket::broadcaster::EventBroadcaster;
    use crate::api::websocket::registry::{Connection, ConnectionRegistry};
    use crate::store::{ArticleStore, FileStore};
    use axum::body::Body;
    use axum::extract::ws::Message;
    use axum::http::Request;
    use tokio::sync::mpsc;
    use tower::util::ServiceExt;

    fn test_state() -> (Arc<AppState>, Arc<ConnectionRegistry>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(ArticleStore::open(tmp.path().join("data")).unwrap());
        let files = FileStore::open(tmp.path().join("uploads")).unwrap();
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = EventBroadcaster::new(registry.clone());
        let state = Arc::new(AppState::new(store, files, registry.clone(), broadcaster));
        (state, registry, tmp)
    }

    #[tokio::test]
    async fn test_health_check() {
        let (state, _registry, _tmp) = test_state();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_get_unknown_article_is_404() {
        let (state, _registry, _tmp) = test_state();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/articles/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_create_without_content_is_400() {
        let (state, registry, _tmp) = test_state();
        let app = create_router(state);

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(Connection::new(registry.next_id(), tx));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/articles")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"A"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        // A failed mutation must not be announced.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_broadcasts_after_commit() {
        let (state, registry, _tmp) = test_state();
        let app = create_router(state.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(Connection::new(registry.next_id(), tx));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/articles")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"A","content":"x"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
        assert_eq!(state.store.len(), 1);

        let Message::Text(json) = rx.try_recv().expect("one event per mutation") else {
            panic!("expected a text frame");
        };
        assert!(json.contains(r#""type":"article_created""#));
        assert!(rx.try_recv().is_err());
    }
}
