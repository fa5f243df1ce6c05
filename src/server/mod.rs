//! HTTP API over the scraped artifacts.
//!
//! Read routes serve the persisted JSON files verbatim. `/scrape` runs the
//! whole pipeline in the request; concurrent scrapes wait on one lock.

pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::storage::CatalogStorage;

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub storage: Arc<dyn CatalogStorage>,
    /// Held for the duration of a scrape
    pub scrape_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, storage: Arc<dyn CatalogStorage>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            storage,
            scrape_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Build application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/ping", get(handlers::ping))
        .route("/scrape", get(handlers::scrape))
        .route("/departments", get(handlers::departments))
        .route("/courses", get(handlers::courses))
        .route("/courses/:dept", get(handlers::department_courses))
        .route("/timetable", get(handlers::timetable))
        .layer(middleware::from_fn(handlers::log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn run(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
    }
}
