//! Request and Response models for the explorer API
//!
//! DTOs for the request parameters the proxy validates locally and the
//! responses it produces itself. Upstream payloads are relayed as raw JSON
//! and have no models here.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{BlocksQuery, MineQuery, NewTransactionRequest};
pub use responses::{ClearCacheResponse, HealthResponse};
