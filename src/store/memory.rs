//! In-Memory Store Backend
//!
//! HashMap-backed implementation of `KeyValueStore` with per-entry expiry.
//! Used by the test suites and for local development without a Redis
//! instance. Honors the same connection state machine as the remote backend
//! so disconnected behavior can be exercised deterministically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CacheError, CacheResult};
use crate::store::{ConnectionState, KeyValueStore};

// == Stored Value ==
/// A single stored payload with its expiration instant.
#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn new(value: String, ttl_seconds: u64) -> Self {
        Self {
            value,
            expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
        }
    }

    /// An entry is expired once the current instant reaches its expiry.
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Instant::now() >= expires,
            None => false,
        }
    }
}

// == Memory Store ==
/// In-process key-value store with lazy expiry.
///
/// There is no background sweep: expired entries are pruned when a read
/// touches them, which matches the store-enforced expiry contract the cache
/// core relies on.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredValue>>,
    state: AtomicU8,
}

impl MemoryStore {
    /// Creates a new, disconnected store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            state: AtomicU8::new(ConnectionState::Disconnected.as_u8()),
        }
    }

    /// Creates a store that is already connected, for test convenience.
    pub fn connected() -> Self {
        let store = Self::new();
        store
            .state
            .store(ConnectionState::Connected.as_u8(), Ordering::SeqCst);
        store
    }

    fn require_connected(&self) -> CacheResult<()> {
        if self.state() != ConnectionState::Connected {
            return Err(CacheError::Connection(
                "memory store is not connected".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn connect(&self) -> CacheResult<()> {
        if self.state() == ConnectionState::Connected {
            return Ok(());
        }
        self.state
            .store(ConnectionState::Connecting.as_u8(), Ordering::SeqCst);
        self.state
            .store(ConnectionState::Connected.as_u8(), Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> CacheResult<()> {
        self.state
            .store(ConnectionState::Disconnected.as_u8(), Ordering::SeqCst);
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.require_connected()?;

        // Write lock so an expired entry can be pruned on the spot.
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(stored) if stored.is_expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(stored) => Ok(Some(stored.value.clone())),
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> CacheResult<()> {
        self.require_connected()?;

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredValue::new(value, ttl_seconds));
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<()> {
        self.require_connected()?;

        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn del_many(&self, keys: &[String]) -> CacheResult<u64> {
        self.require_connected()?;

        let mut entries = self.entries.write().await;
        let mut removed = 0;
        for key in keys {
            if entries.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> CacheResult<Vec<String>> {
        self.require_connected()?;

        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(key, stored)| key.starts_with(prefix) && !stored.is_expired())
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn ping(&self) -> CacheResult<()> {
        self.require_connected()
    }
}
