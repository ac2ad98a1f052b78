// Copyright 2026 Fale Relay Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for the relay.
//!
//! `POST /fetch` runs the [`Relay`] pipeline; `GET /health` reports
//! liveness. Every error leaves as `{ "error": "..." }` with the status
//! chosen by [`RelayError::status`].

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::relay::{FetchRequest, FetchResponse, Relay};

/// Build the axum Router with all REST endpoints.
pub fn router(relay: Arc<Relay>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/fetch", post(handle_fetch))
        .layer(cors)
        .with_state(relay)
}

/// Bind the configured address and serve until ctrl-c.
pub async fn start(config: &RelayConfig) -> anyhow::Result<()> {
    let relay = Arc::new(Relay::new(config)?);
    let app = router(relay);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("REST API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn handle_fetch(
    State(relay): State<Arc<Relay>>,
    headers: HeaderMap,
    body: Bytes,
) -> RelayResult<Json<FetchResponse>> {
    let request = parse_fetch_request(&headers, &body)?;
    tracing::info!(url = request.url.as_deref().unwrap_or(""), "fetch request");

    let response = relay.handle(request).await?;
    Ok(Json(response))
}

/// Read the `/fetch` payload.
///
/// A body that is absent, blank or not declared as JSON carries no `url`
/// and yields an empty request. Only a declared JSON body that fails to
/// parse is rejected here.
fn parse_fetch_request(headers: &HeaderMap, body: &[u8]) -> RelayResult<FetchRequest> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FetchRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| RelayError::InvalidBody(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn test_parse_fetch_request_json() {
        let req = parse_fetch_request(&json_headers(), br#"{"url":"https://example.com/"}"#).unwrap();
        assert_eq!(req.url.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn test_parse_fetch_request_without_body_or_content_type() {
        assert!(parse_fetch_request(&HeaderMap::new(), b"").unwrap().url.is_none());
        assert!(parse_fetch_request(&json_headers(), b"  ").unwrap().url.is_none());
        assert!(parse_fetch_request(&HeaderMap::new(), b"url=https://example.com/")
            .unwrap()
            .url
            .is_none());
    }

    #[test]
    fn test_parse_fetch_request_rejects_malformed_json() {
        let err = parse_fetch_request(&json_headers(), b"{not json").unwrap_err();
        assert!(matches!(err, RelayError::InvalidBody(_)));
        let err = parse_fetch_request(&json_headers(), br#"{"url": 5}"#).unwrap_err();
        assert!(matches!(err, RelayError::InvalidBody(_)));
    }
}
