//! Integration Tests for the Explorer Cache
//!
//! Exercises the caching contract through the crate's public API: cache
//! semantics over a shared store, the response interception middleware, and
//! invalidation after mutating requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::util::ServiceExt;

use explorer_cache::api::{cache_middleware, create_router, invalidate_after, Mutation};
use explorer_cache::cache::{Cache, Namespace};
use explorer_cache::store::{KeyValueStore, MemoryStore};
use explorer_cache::upstream::UpstreamClient;
use explorer_cache::AppState;

// == Helper Functions ==

fn build_cache(prefix: &str, store: Arc<MemoryStore>) -> Cache {
    Cache::new(
        store,
        Namespace::new(prefix),
        60,
        Duration::from_millis(2000),
    )
}

fn build_state(store: Arc<MemoryStore>) -> AppState {
    AppState::new(
        build_cache("cache:", store),
        UpstreamClient::new("http://localhost:0"),
    )
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send_get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let json = body_to_json(response.into_body()).await;
    (status, json)
}

// == Cache Semantics ==

#[tokio::test]
async fn test_miss_then_hit_until_expiry() {
    let store = Arc::new(MemoryStore::connected());
    let cache = build_cache("cache:", store);

    assert_eq!(cache.get::<Value>("/api/blocks").await, None);

    let value = json!({ "blocks": [{ "index": 0 }] });
    assert!(cache.set("/api/blocks", &value, None).await);
    assert_eq!(cache.get::<Value>("/api/blocks").await, Some(value));
}

#[tokio::test]
async fn test_entry_expires_after_ttl() {
    let store = Arc::new(MemoryStore::connected());
    let cache = build_cache("cache:", store);

    cache.set("/api/stats", &json!({ "blocks": 7 }), Some(1)).await;
    assert!(cache.get::<Value>("/api/stats").await.is_some());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(cache.get::<Value>("/api/stats").await, None);
}

#[tokio::test]
async fn test_namespaces_are_isolated_on_shared_store() {
    let store = Arc::new(MemoryStore::connected());
    let cache_a = build_cache("a:", store.clone());
    let cache_b = build_cache("b:", store);

    cache_a.set("/api/blocks", &json!("a"), None).await;

    assert_eq!(cache_b.get::<Value>("/api/blocks").await, None);
    assert_eq!(cache_b.stats().await.count, 0);
    assert_eq!(cache_a.stats().await.keys, vec!["/api/blocks".to_string()]);
}

#[tokio::test]
async fn test_delete_invalidates_entry() {
    let store = Arc::new(MemoryStore::connected());
    let cache = build_cache("cache:", store);

    cache.set("/api/transactions", &json!([]), None).await;
    assert!(cache.delete("/api/transactions").await);
    assert_eq!(cache.get::<Value>("/api/transactions").await, None);
}

#[tokio::test]
async fn test_clear_empties_namespace() {
    let store = Arc::new(MemoryStore::connected());
    let cache = build_cache("cache:", store);

    for i in 0..10 {
        cache.set(&format!("/api/blocks/{}", i), &json!(i), None).await;
    }
    assert_eq!(cache.stats().await.count, 10);

    assert!(cache.clear().await);

    assert_eq!(cache.stats().await.count, 0);
    for i in 0..10 {
        assert_eq!(
            cache.get::<Value>(&format!("/api/blocks/{}", i)).await,
            None
        );
    }
}

#[tokio::test]
async fn test_disconnected_store_fails_open() {
    let store = Arc::new(MemoryStore::connected());
    let cache = build_cache("cache:", store.clone());

    cache.set("/api/blocks", &json!([]), None).await;
    store.disconnect().await.unwrap();

    assert_eq!(cache.get::<Value>("/api/blocks").await, None);
    assert!(!cache.set("/api/blocks", &json!([]), None).await);
    assert!(!cache.delete("/api/blocks").await);

    let stats = cache.stats().await;
    assert!(!stats.connected);
    assert!(stats.error.is_some());
}

// == Middleware Scenarios ==

#[tokio::test]
async fn test_repeat_get_is_served_from_cache_without_handler() {
    let store = Arc::new(MemoryStore::connected());
    let state = build_state(store.clone());
    let counter = Arc::new(AtomicUsize::new(0));
    let handler_counter = counter.clone();

    let app = Router::new()
        .route(
            "/api/blocks",
            get(move || {
                let counter = handler_counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "blocks": [{ "index": 0, "transactions": [] }] }))
                }
            }),
        )
        .route_layer(from_fn_with_state(state, cache_middleware));

    let (status, first) = send_get(&app, "/api/blocks?page=1").await;
    assert_eq!(status, StatusCode::OK);

    // Give the spawned cache write time to land.
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The payload is stored under the namespaced path + query key.
    let stored = store
        .get("cache:/api/blocks?page=1")
        .await
        .unwrap()
        .expect("response should be cached");
    assert_eq!(serde_json::from_str::<Value>(&stored).unwrap(), first);

    let (status, second) = send_get(&app, "/api/blocks?page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_post_invalidates_and_next_get_sees_new_transaction() {
    let store = Arc::new(MemoryStore::connected());
    let state = build_state(store);
    let transactions = Arc::new(RwLock::new(Vec::<String>::new()));
    let counter = Arc::new(AtomicUsize::new(0));

    let list_txs = transactions.clone();
    let list_counter = counter.clone();
    let post_txs = transactions.clone();
    let post_state = state.clone();

    let app = Router::new()
        .route(
            "/api/transactions",
            get(move || {
                let txs = list_txs.clone();
                let counter = list_counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "transactions": txs.read().await.clone() }))
                }
            })
            .post(move |Json(body): Json<Value>| {
                let txs = post_txs.clone();
                let state = post_state.clone();
                async move {
                    let hash = body["hash"].as_str().unwrap_or("tx").to_string();
                    txs.write().await.push(hash);
                    invalidate_after(&state.cache, Mutation::SubmitTransaction).await;
                    (StatusCode::CREATED, Json(json!({ "ok": true })))
                }
            }),
        )
        .route_layer(from_fn_with_state(state.clone(), cache_middleware));

    // Prime the cache with the empty listing.
    let (_, listing) = send_get(&app, "/api/transactions").await;
    assert_eq!(listing["transactions"], json!([]));
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Cached: the handler is not invoked again.
    send_get(&app, "/api/transactions").await;
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    // Submit a transaction; the mutation invalidates the listing key.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/transactions")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"hash":"abc123"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The next read misses the cache and observes the new transaction.
    let (_, listing) = send_get(&app, "/api/transactions").await;
    assert_eq!(listing["transactions"], json!(["abc123"]));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_middleware_passes_through_with_store_down() {
    let store = Arc::new(MemoryStore::new());
    let state = build_state(store);
    let counter = Arc::new(AtomicUsize::new(0));
    let handler_counter = counter.clone();

    let app = Router::new()
        .route(
            "/api/stats",
            get(move || {
                let counter = handler_counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "blocks": 3, "transactions": 12 }))
                }
            }),
        )
        .route_layer(from_fn_with_state(state, cache_middleware));

    // The handler's normal response still flows through the middleware.
    let (status, body) = send_get(&app, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blocks"], json!(3));

    send_get(&app, "/api/stats").await;
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

// == Full Router ==

#[tokio::test]
async fn test_health_reports_store_state() {
    let store = Arc::new(MemoryStore::connected());
    let app = create_router(build_state(store));

    let (status, body) = send_get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["store"], json!("connected"));
}

#[tokio::test]
async fn test_cache_admin_endpoints() {
    let store = Arc::new(MemoryStore::connected());
    let state = build_state(store);
    state.cache.set("/api/blocks", &json!([]), None).await;
    let app = create_router(state);

    let (status, stats) = send_get(&app, "/cache/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["count"], json!(1));
    assert_eq!(stats["keys"], json!(["/api/blocks"]));

    let response = app
        .clone()
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
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["cleared"], json!(true));

    let (_, stats) = send_get(&app, "/cache/stats").await;
    assert_eq!(stats["count"], json!(0));
}
