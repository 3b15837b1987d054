//! The forwarder: relays any non-/metrics request to the printer with digest
//! credentials injected.
//!
//! Pure per-call translation, no state. Method and body are preserved on the
//! way up; status, headers, and body are relayed verbatim on the way back.
//! Local failures answer 500 with the error text as the body and are never
//! retried.

use crate::server::AppState;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::warn;

pub async fn forward(State(state): State<Arc<AppState>>, req: Request<Body>) -> Response {
    let (parts, body) = req.into_parts();
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => return local_error(err),
    };
    match relay(&state, parts.method, &parts.uri, body).await {
        Ok(response) => response,
        Err(err) => local_error(err),
    }
}

async fn relay(
    state: &AppState,
    method: Method,
    uri: &Uri,
    body: Bytes,
) -> anyhow::Result<Response> {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let upstream = state
        .proxy_client
        .execute(method, path_and_query, body.to_vec())
        .await?;

    let status = upstream.status();
    let headers = upstream.headers().clone();
    let body = upstream.bytes().await?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

fn local_error(err: impl std::fmt::Display) -> Response {
    warn!(error = %err, "proxy request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}
