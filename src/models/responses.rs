//! Response DTOs for the explorer API
//!
//! Responses the proxy produces itself; everything proxied from upstream is
//! relayed as raw JSON.

use serde::Serialize;

use crate::store::ConnectionState;

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status, always "ok" when the server answers
    pub status: String,
    /// Store connection state; the service stays healthy uncached
    pub store: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse for the given store state.
    pub fn new(store_state: ConnectionState) -> Self {
        Self {
            status: "ok".to_string(),
            store: store_state.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the administrative cache reset (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    /// Whether the namespace was fully cleared
    pub cleared: bool,
}

impl ClearCacheResponse {
    pub fn new(cleared: bool) -> Self {
        Self { cleared }
    }
}
