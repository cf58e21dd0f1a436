//! API Handlers
//!
//! HTTP request handlers for the explorer proxy. Read handlers forward to
//! the upstream blockchain API and rely on the caching middleware wrapped
//! around their routes; mutating handlers invalidate the affected cache
//! keys after the mutation has succeeded upstream.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::invalidation::{invalidate_after, Mutation};
use crate::cache::{Cache, NamespaceStats};
use crate::error::ApiError;
use crate::models::{
    BlocksQuery, ClearCacheResponse, HealthResponse, MineQuery, NewTransactionRequest,
};
use crate::upstream::UpstreamClient;

/// Application state shared across all handlers.
///
/// The cache and the upstream client are constructed once at startup and
/// injected; handlers hold no state of their own.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache over the single store connection
    pub cache: Arc<Cache>,
    /// Client for the upstream blockchain API
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Creates a new AppState from an assembled cache and upstream client.
    pub fn new(cache: Cache, upstream: UpstreamClient) -> Self {
        Self {
            cache: Arc::new(cache),
            upstream,
        }
    }
}

/// Handler for GET /api/blocks
///
/// Forwards the paginated block listing request upstream.
pub async fn list_blocks(
    State(state): State<AppState>,
    Query(query): Query<BlocksQuery>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .upstream
        .get(
            "/blocks",
            &[
                ("page", query.page().to_string()),
                ("per_page", query.per_page().to_string()),
            ],
        )
        .await?;
    Ok(Json(body))
}

/// Handler for GET /api/blocks/:block_id
pub async fn get_block(
    State(state): State<AppState>,
    Path(block_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .upstream
        .get(&format!("/blocks/{}", block_id), &[])
        .await?;
    Ok(Json(body))
}

/// Handler for GET /api/transactions
pub async fn list_transactions(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let body = state.upstream.get("/transactions", &[]).await?;
    Ok(Json(body))
}

/// Handler for GET /api/transactions/:tx_hash
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(tx_hash): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let body = state
        .upstream
        .get(&format!("/transactions/{}", tx_hash), &[])
        .await?;
    Ok(Json(body))
}

/// Handler for POST /api/transactions
///
/// Submits a transaction upstream, then invalidates the transaction-list
/// cache entry so the next read observes the new transaction.
pub async fn submit_transaction(
    State(state): State<AppState>,
    Json(req): Json<NewTransactionRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::BadRequest(error_msg));
    }

    let body = state.upstream.post("/transactions/new", &req).await?;

    invalidate_after(&state.cache, Mutation::SubmitTransaction).await;

    Ok((StatusCode::CREATED, Json(body)))
}

/// Handler for GET /api/mine
///
/// A read-method route with side effects upstream, so it lives outside the
/// cached sub-router. Invalidates every key derived from the chain state
/// once the block has been mined.
pub async fn mine_block(
    State(state): State<AppState>,
    Query(query): Query<MineQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut params = Vec::new();
    if let Some(miner) = query.miner {
        params.push(("miner", miner));
    }

    let body = state.upstream.get("/mine", &params).await?;

    invalidate_after(&state.cache, Mutation::MineBlock).await;

    Ok(Json(body))
}

/// Handler for GET /api/stats
pub async fn chain_stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let body = state.upstream.get("/stats", &[]).await?;
    Ok(Json(body))
}

/// Handler for GET /api/coin/info
pub async fn coin_info(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let body = state.upstream.get("/coin/info", &[]).await?;
    Ok(Json(body))
}

/// Handler for GET /api/validate
pub async fn validate_chain(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let body = state.upstream.get("/chain/validate", &[]).await?;
    Ok(Json(body))
}

/// Handler for GET /health
///
/// Answers regardless of store health; a degraded cache only shows up in
/// the reported store state.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.cache.store_state()))
}

/// Handler for GET /cache/stats
///
/// Lists the live cache keys under the namespace and their count.
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<NamespaceStats> {
    Json(state.cache.stats().await)
}

/// Handler for DELETE /cache
///
/// Administrative reset of the whole namespace.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    Json(ClearCacheResponse::new(state.cache.clear().await))
}
