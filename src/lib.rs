//! Explorer Cache - a read-through caching layer for a blockchain API
//!
//! Fronts a slower upstream query service with a cache-aside layer: cached
//! JSON is served within a bounded staleness window, and mutating operations
//! invalidate exactly the entries whose truth they affect.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod upstream;

pub use api::AppState;
pub use cache::{Cache, Namespace};
pub use config::Config;
