//! HTTP front end.
//!
//! # Endpoints
//!
//! - `POST /wh` - push notification; 200 once the paths are queued, 400 on any
//!   decode or authorization failure
//! - anything else - 404

pub mod handler;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::post;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use crate::config::Config;
use crate::queue::{DispatchSender, dispatch_queue};
use crate::registry::RepositoryRegistry;
use crate::sync::SyncOperation;
use crate::worker::{UpdateWorker, spawn_dispatcher};

pub use handler::{not_found, webhook_handler};

/// Path of the ingestion endpoint.
pub const WEBHOOK_PATH: &str = "/wh";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: RepositoryRegistry,
    queue: DispatchSender,
}

impl AppState {
    pub fn new(registry: RepositoryRegistry, queue: DispatchSender) -> Self {
        AppState {
            inner: Arc::new(AppStateInner { registry, queue }),
        }
    }

    pub fn registry(&self) -> &RepositoryRegistry {
        &self.inner.registry
    }

    pub fn queue(&self) -> &DispatchSender {
        &self.inner.queue
    }
}

/// Build the router with the webhook endpoint and the not-found fallback.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(webhook_handler))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Wire queue, worker and router together for `config`.
///
/// Spawns the dispatcher task, so this must run inside a tokio runtime.
pub fn build_app(config: &Config, operation: Arc<dyn SyncOperation>) -> Router {
    let (queue, receiver) = dispatch_queue(config.buffer_size);
    let worker = Arc::new(UpdateWorker::new(operation, config.sync_timeout()));
    spawn_dispatcher(receiver, worker);
    build_router(AppState::new(config.registry(), queue))
}

/// Start the webhook server and serve until Ctrl+C.
pub async fn start_server(config: &Config, operation: Arc<dyn SyncOperation>) -> Result<()> {
    let addr = config.listen_addr()?;
    let app = build_app(config, operation);

    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "webhook server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
