//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection URL for the key-value store
    pub store_url: String,
    /// Base URL of the upstream blockchain API
    pub upstream_url: String,
    /// Default TTL in seconds for cached entries
    pub default_ttl: u64,
    /// Namespace prefix applied to every cache key
    pub key_prefix: String,
    /// HTTP server port
    pub server_port: u16,
    /// Per-operation store timeout in milliseconds
    pub store_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORE_URL` - Key-value store URL (default: redis://127.0.0.1:6379)
    /// - `UPSTREAM_URL` - Blockchain API base URL (default: http://localhost:5000)
    /// - `DEFAULT_TTL` - Default entry TTL in seconds (default: 60)
    /// - `KEY_PREFIX` - Cache key namespace prefix (default: "cache:")
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORE_TIMEOUT_MS` - Store operation timeout (default: 2000)
    pub fn from_env() -> Self {
        Self {
            store_url: env::var("STORE_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            upstream_url: env::var("UPSTREAM_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            key_prefix: env::var("KEY_PREFIX").unwrap_or_else(|_| "cache:".to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            store_timeout_ms: env::var("STORE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: "redis://127.0.0.1:6379".to_string(),
            upstream_url: "http://localhost:5000".to_string(),
            default_ttl: 60,
            key_prefix: "cache:".to_string(),
            server_port: 3000,
            store_timeout_ms: 2000,
        }
    }
}
