//! HTTP server wiring: the /metrics scrape endpoint plus the forwarding
//! fallback for everything else.

use crate::client::PrinterClient;
use crate::collector::SnapshotCollector;
use crate::{exposition, proxy};
use anyhow::Result;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub collector: SnapshotCollector,
    pub proxy_client: PrinterClient,
}

/// Build the router. Split out from [`run`] so tests can serve it on an
/// ephemeral port.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .fallback(proxy::forward)
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run(bind: &str, state: AppState) -> Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Every scrape triggers a fresh collection cycle; there is no caching
/// between scrapes, and concurrent scrapes are fully independent.
async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    let samples = state.collector.collect().await;
    match exposition::encode(&samples) {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}
