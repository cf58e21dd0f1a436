//! Cache Core Module
//!
//! Get/set/delete/clear/stats over the namespaced store. Every operation is
//! fail-open: store failures, timeouts, and malformed payloads degrade to a
//! miss (or a `false` write result) and leave their trace in the logs only.
//! Caching must never break the primary data path.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{Namespace, NamespaceStats};
use crate::config::Config;
use crate::error::{CacheError, CacheResult};
use crate::store::{ConnectionState, KeyValueStore};

// == Cache ==
/// Namespaced, fail-open cache over a shared key-value store.
///
/// Explicitly constructed and injected wherever caching is needed; holds the
/// single shared store handle rather than any global state.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    namespace: Namespace,
    default_ttl: u64,
    op_timeout: Duration,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache over `store`.
    ///
    /// # Arguments
    /// * `store` - Shared store handle, one logical connection per process
    /// * `namespace` - Prefix scoping this cache's keys
    /// * `default_ttl` - TTL in seconds applied when a `set` passes no TTL
    /// * `op_timeout` - Upper bound for any single store operation
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        namespace: Namespace,
        default_ttl: u64,
        op_timeout: Duration,
    ) -> Self {
        Self {
            store,
            namespace,
            default_ttl,
            op_timeout,
        }
    }

    /// Creates a cache with namespace, TTL, and timeout taken from config.
    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self::new(
            store,
            Namespace::new(config.key_prefix.clone()),
            config.default_ttl,
            Duration::from_millis(config.store_timeout_ms),
        )
    }

    /// Current connection state of the underlying store.
    pub fn store_state(&self) -> ConnectionState {
        self.store.state()
    }

    /// Bounds a store operation by the configured timeout.
    ///
    /// An elapsed timeout maps to the same failure outcome as a store error,
    /// so a hung store can never stall a request.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = CacheResult<T>>,
    ) -> CacheResult<T> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.op_timeout.as_millis() as u64)),
        }
    }

    // == Get ==
    /// Looks up and deserializes the value cached under `logical_key`.
    ///
    /// Returns `None` when the key is missing, expired, the payload is
    /// malformed, or the store fails; every failure is logged, never raised.
    pub async fn get<T: DeserializeOwned>(&self, logical_key: &str) -> Option<T> {
        let physical = self.namespace.physical_key(logical_key);

        let raw = match self.bounded(self.store.get(&physical)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = %logical_key, error = %err, "cache get degraded to miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                let err = CacheError::from(err);
                warn!(key = %logical_key, error = %err, "discarding cached payload");
                None
            }
        }
    }

    // == Set ==
    /// Serializes `value` and writes it under `logical_key` with a TTL.
    ///
    /// Returns `false` on any failure; callers treat that as "not cached
    /// this time". The response to the original caller has already been
    /// determined by then, so the write is best effort.
    pub async fn set<T: Serialize>(
        &self,
        logical_key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> bool {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(key = %logical_key, error = %err, "cache set skipped, value not serializable");
                return false;
            }
        };

        let physical = self.namespace.physical_key(logical_key);
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        match self.bounded(self.store.set_ex(&physical, payload, ttl)).await {
            Ok(()) => {
                debug!(key = %logical_key, ttl, "cached");
                true
            }
            Err(err) => {
                warn!(key = %logical_key, error = %err, "cache set failed");
                false
            }
        }
    }

    // == Delete ==
    /// Removes the entry under `logical_key`. Absence is not an error.
    ///
    /// Returns `false` only when the store operation itself failed.
    pub async fn delete(&self, logical_key: &str) -> bool {
        let physical = self.namespace.physical_key(logical_key);

        match self.bounded(self.store.del(&physical)).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key = %logical_key, error = %err, "cache delete failed");
                false
            }
        }
    }

    // == Clear ==
    /// Removes every entry under the namespace.
    ///
    /// Administrative reset, O(namespace size); not for hot paths.
    pub async fn clear(&self) -> bool {
        let keys = match self
            .bounded(self.store.keys_with_prefix(self.namespace.prefix()))
            .await
        {
            Ok(keys) => keys,
            Err(err) => {
                warn!(error = %err, "cache clear failed while listing keys");
                return false;
            }
        };

        if keys.is_empty() {
            return true;
        }

        match self.bounded(self.store.del_many(&keys)).await {
            Ok(removed) => {
                debug!(removed, "cache cleared");
                true
            }
            Err(err) => {
                warn!(error = %err, "cache clear failed while deleting keys");
                false
            }
        }
    }

    // == Stats ==
    /// Reports the live logical keys under the namespace and their count.
    ///
    /// Best effort: a store failure produces a degraded report, never an
    /// error.
    pub async fn stats(&self) -> NamespaceStats {
        match self
            .bounded(self.store.keys_with_prefix(self.namespace.prefix()))
            .await
        {
            Ok(keys) => {
                let logical: Vec<String> = keys
                    .iter()
                    .filter_map(|key| self.namespace.strip(key))
                    .map(str::to_string)
                    .collect();
                NamespaceStats::from_keys(logical)
            }
            Err(err) => {
                warn!(error = %err, "cache stats unavailable");
                NamespaceStats::unavailable(err.to_string())
            }
        }
    }
}
