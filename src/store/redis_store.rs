//! Redis Store Backend
//!
//! Production implementation of `KeyValueStore` backed by a Redis server.
//! Holds one `ConnectionManager`, which multiplexes a single logical
//! connection across concurrent callers and transparently re-establishes it
//! after transient failures.

use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{CacheError, CacheResult};
use crate::store::{ConnectionState, KeyValueStore};

// == Redis Store ==
/// Redis-backed key-value store with an explicit connect/disconnect lifecycle.
pub struct RedisStore {
    url: String,
    conn: RwLock<Option<ConnectionManager>>,
    state: AtomicU8,
}

impl RedisStore {
    /// Creates a new, disconnected store targeting `url`.
    ///
    /// No network traffic happens until `connect()` is called.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            conn: RwLock::new(None),
            state: AtomicU8::new(ConnectionState::Disconnected.as_u8()),
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state.as_u8(), Ordering::SeqCst);
    }

    /// Clones the shared connection handle, failing when disconnected.
    async fn manager(&self) -> CacheResult<ConnectionManager> {
        self.conn.read().await.clone().ok_or_else(|| {
            CacheError::Connection("redis store is not connected".to_string())
        })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn connect(&self) -> CacheResult<()> {
        // The write lock serializes concurrent connect attempts.
        let mut conn = self.conn.write().await;
        if conn.is_some() {
            return Ok(());
        }

        self.set_state(ConnectionState::Connecting);

        let client = redis::Client::open(self.url.as_str()).map_err(|err| {
            self.set_state(ConnectionState::Disconnected);
            CacheError::Connection(err.to_string())
        })?;

        match client.get_connection_manager().await {
            Ok(manager) => {
                *conn = Some(manager);
                self.set_state(ConnectionState::Connected);
                info!(url = %self.url, "connected to store");
                Ok(())
            }
            Err(err) => {
                self.set_state(ConnectionState::Disconnected);
                Err(CacheError::Connection(err.to_string()))
            }
        }
    }

    async fn disconnect(&self) -> CacheResult<()> {
        let mut conn = self.conn.write().await;
        if conn.take().is_some() {
            info!(url = %self.url, "disconnected from store");
        }
        self.set_state(ConnectionState::Disconnected);
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.manager().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> CacheResult<()> {
        let mut conn = self.manager().await?;
        let _: () = conn.set_ex(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.manager().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn del_many(&self, keys: &[String]) -> CacheResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.manager().await?;
        let removed: u64 = conn.del(keys.to_vec()).await?;
        Ok(removed)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.manager().await?;
        let keys: Vec<String> = conn.keys(format!("{}*", prefix)).await?;
        Ok(keys)
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.manager().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
