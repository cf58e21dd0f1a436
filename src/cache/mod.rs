//! Cache Module
//!
//! Namespaced, fail-open caching over the store connector.

mod core;
mod key;
mod stats;


// Re-export public types
pub use self::core::Cache;
pub use key::Namespace;
pub use stats::NamespaceStats;
