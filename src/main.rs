//! Article server binary entry point

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use article_hub::api::http::create_router;
use article_hub::api::websocket::broadcaster::EventBroadcaster;
use article_hub::api::websocket::registry::ConnectionRegistry;
use article_hub::api::websocket::state::AppState;
use article_hub::config::ServerConfig;
use article_hub::store::{ArticleStore, FileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();

    let store = Arc::new(ArticleStore::open(&config.data_dir).context("open article store")?);
    let files = FileStore::open(&config.upload_dir).context("open upload store")?;

    // Composition root: the registry/broadcaster pair is built here and
    // injected into the handlers that emit events.
    let registry = Arc::new(ConnectionRegistry::new());
    let broadcaster = EventBroadcaster::new(registry.clone());
    let state = Arc::new(AppState::new(store, files, registry, broadcaster));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "article server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
