//! Response Interception Middleware
//!
//! Wraps the request/response cycle of cacheable routes: checks the cache
//! before the downstream handler runs, short-circuits on a hit, and on a
//! miss captures the handler's successful JSON output and writes it back to
//! the cache without altering the bytes sent to the client.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, error};

use super::handlers::AppState;

/// Caching middleware for read-only routes.
///
/// Per-request flow: received -> cache-check -> (hit: respond) |
/// (miss: forward -> capture -> cache-write -> respond). Only GET requests
/// are eligible; everything else flows straight to the handler. A payload is
/// persisted only when the handler answered 200 with an `application/json`
/// content type, and the write runs on a spawned task so it can neither
/// delay nor break the client-visible response.
pub async fn cache_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    // Mutating methods bypass the cache entirely.
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let logical_key = request_key(&request);

    if let Some(cached) = state.cache.get::<Value>(&logical_key).await {
        debug!(key = %logical_key, "cache hit");
        return Json(cached).into_response();
    }
    debug!(key = %logical_key, "cache miss");

    let response = next.run(request).await;

    if response.status() != StatusCode::OK || !has_json_content_type(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!(key = %logical_key, error = %err, "failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(payload) => {
            let cache = state.cache.clone();
            let key = logical_key.clone();
            tokio::spawn(async move {
                cache.set(&key, &payload, None).await;
            });
        }
        Err(err) => {
            debug!(key = %logical_key, error = %err, "response body is not JSON, not caching");
        }
    }

    Response::from_parts(parts, Body::from(bytes))
}

/// Logical cache key for a request: full path plus query string, so
/// distinct query parameters map to distinct entries.
fn request_key(request: &Request) -> String {
    request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn has_json_content_type(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false)
}
