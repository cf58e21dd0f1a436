//! API Routes
//!
//! Configures the Axum router. Cacheable read routes live in a sub-router
//! wrapped by the caching middleware; mutating or side-effectful routes are
//! merged alongside it and never touch the cache on the way in.

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, chain_stats, clear_cache_handler, coin_info, get_block, get_transaction,
    health_handler, list_blocks, list_transactions, mine_block, submit_transaction,
    validate_chain, AppState,
};
use super::middleware::cache_middleware;

/// Creates the main router with all endpoints configured.
///
/// # Cached endpoints (GET, read-through)
/// - `GET /api/blocks` - paginated block listing
/// - `GET /api/blocks/:block_id` - single block
/// - `GET /api/transactions` - transaction listing
/// - `GET /api/transactions/:tx_hash` - single transaction
/// - `GET /api/stats` - chain statistics
/// - `GET /api/coin/info` - coin supply info
///
/// `POST /api/transactions` shares its path with the cached listing; the
/// middleware passes non-GET methods straight through.
///
/// # Uncached endpoints
/// - `GET /api/mine` - mines a block (side effects; deliberately uncached)
/// - `GET /api/validate` - chain validation
/// - `GET /health` - liveness, includes store state
/// - `GET /cache/stats` - live cache keys and count
/// - `DELETE /cache` - administrative cache reset
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cached = Router::new()
        .route("/api/blocks", get(list_blocks))
        .route("/api/blocks/:block_id", get(get_block))
        .route(
            "/api/transactions",
            get(list_transactions).post(submit_transaction),
        )
        .route("/api/transactions/:tx_hash", get(get_transaction))
        .route("/api/stats", get(chain_stats))
        .route("/api/coin/info", get(coin_info))
        .route_layer(from_fn_with_state(state.clone(), cache_middleware));

    Router::new()
        .merge(cached)
        .route("/api/mine", get(mine_block))
        .route("/api/validate", get(validate_chain))
        .route("/health", get(health_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, Namespace};
    use crate::store::MemoryStore;
    use crate::upstream::UpstreamClient;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let store = Arc::new(MemoryStore::connected());
        let cache = Cache::new(
            store,
            Namespace::new("cache:"),
            60,
            Duration::from_millis(2000),
        );
        let state = AppState::new(cache, UpstreamClient::new("http://localhost:0"));
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cache_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/cache/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_clear_cache_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/cache")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_submit_transaction_invalid_body_is_rejected() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/transactions")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"sender":"","recipient":"bob","amount":1.0}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        // Rejected locally, before any upstream traffic.
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
