//! Store Module
//!
//! Connector abstraction over a remote key-value store. The cache core only
//! sees the `KeyValueStore` trait; backends provide the minimal command set
//! it needs (get, set-with-expiry, delete, bulk delete, prefix listing,
//! liveness) plus an explicit connect/disconnect lifecycle.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use async_trait::async_trait;

use crate::error::CacheResult;

// == Connection State ==
/// Lifecycle state of a store connection.
///
/// Transitions: `Disconnected -> Connecting -> Connected -> Disconnected`
/// (on explicit close, fatal error, or shutdown). State changes are
/// observable for logging and health checks but carry no data guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            _ => ConnectionState::Disconnected,
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        write!(f, "{}", label)
    }
}

// == Key-Value Store Trait ==
/// Minimal command set a physical store must expose.
///
/// One logical connection per instance, shared across concurrent callers.
/// The store provides atomicity per single-key command; no cross-key
/// transactions exist. Absence of a key is never an error for `del`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Establishes the connection. Idempotent: a no-op when already connected.
    async fn connect(&self) -> CacheResult<()>;

    /// Closes the connection and releases resources. Idempotent.
    async fn disconnect(&self) -> CacheResult<()>;

    /// Current connection state, readable without suspending.
    fn state(&self) -> ConnectionState;

    /// Fetches the raw payload stored under `key`, if any.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key` with a relative expiry in whole seconds.
    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> CacheResult<()>;

    /// Removes `key`. Succeeds whether or not the key existed.
    async fn del(&self, key: &str) -> CacheResult<()>;

    /// Removes every key in `keys`, returning how many were present.
    async fn del_many(&self, keys: &[String]) -> CacheResult<u64>;

    /// Lists all physical keys starting with `prefix`.
    async fn keys_with_prefix(&self, prefix: &str) -> CacheResult<Vec<String>>;

    /// Liveness probe against the store.
    async fn ping(&self) -> CacheResult<()>;
}
