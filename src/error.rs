//! Error types for the explorer cache
//!
//! Two independent taxonomies: `CacheError` covers failures inside the
//! caching layer and is never surfaced over HTTP (the cache is fail-open),
//! while `ApiError` is the response-facing error for the proxy handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

// == Cache Error Enum ==
/// Failures internal to the caching layer.
///
/// Every variant degrades to "act as if uncached" at the call site; none of
/// them ever determines the HTTP response sent to a client.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The remote store is unreachable or not connected
    #[error("store unreachable: {0}")]
    Connection(String),

    /// A stored payload could not be parsed; treated as a miss
    #[error("malformed cached payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A single store command failed transiently
    #[error("store operation failed: {0}")]
    StoreOperation(String),

    /// A store command exceeded the configured operation timeout
    #[error("store operation timed out after {0}ms")]
    Timeout(u64),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_io_error() {
            CacheError::Connection(err.to_string())
        } else {
            CacheError::StoreOperation(err.to_string())
        }
    }
}

// == Cache Result Type Alias ==
/// Convenience Result type for store and cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

// == API Error Enum ==
/// Errors produced by the proxy handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Upstream answered with a non-success status; relayed as-is
    #[error("upstream returned {0}")]
    UpstreamStatus(StatusCode, Value),

    /// Upstream could not be reached or returned an unreadable body
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// Invalid request data
    #[error("invalid request: {0}")]
    BadRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::UpstreamStatus(status, body) => (status, Json(body)).into_response(),
            ApiError::Upstream(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response(),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        let err = CacheError::Connection("refused".to_string());
        assert!(err.to_string().contains("store unreachable"));

        let err = CacheError::Timeout(2000);
        assert!(err.to_string().contains("2000ms"));
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let parse_err = serde_json::from_str::<Value>("not json").unwrap_err();
        let err: CacheError = parse_err.into();
        assert!(matches!(err, CacheError::Serialization(_)));
    }

    #[test]
    fn test_api_error_bad_request_response() {
        let response = ApiError::BadRequest("missing field".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_error_upstream_status_relayed() {
        let body = json!({ "error": "Block not found" });
        let response = ApiError::UpstreamStatus(StatusCode::NOT_FOUND, body).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
