//! API Module
//!
//! HTTP surface of the explorer cache: proxy handlers, the caching
//! middleware, the invalidation table, and routing.
//!
//! # Endpoints
//! - `GET /api/blocks[?page&per_page]` - cached block listing
//! - `GET /api/blocks/:block_id` - cached block lookup
//! - `GET /api/transactions` / `POST /api/transactions` - cached listing / submission
//! - `GET /api/transactions/:tx_hash` - cached transaction lookup
//! - `GET /api/stats`, `GET /api/coin/info` - cached chain introspection
//! - `GET /api/mine`, `GET /api/validate` - uncached chain operations
//! - `GET /health`, `GET /cache/stats`, `DELETE /cache` - service endpoints

pub mod handlers;
pub mod invalidation;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use invalidation::{invalidate_after, Mutation};
pub use middleware::cache_middleware;
pub use routes::create_router;
