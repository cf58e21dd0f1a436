//! Key Namespace Module
//!
//! Deterministic mapping from logical cache keys to physical store keys.
//! The prefix scopes every key so multiple logical caches can share one
//! physical store without colliding.

// == Namespace ==
/// Static prefix applied to every logical key before it reaches the store.
///
/// Two namespaces with different prefixes never collide, even when the
/// logical keys match.
#[derive(Debug, Clone)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    /// Creates a namespace with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Maps a logical key to the physical key stored in the backend.
    ///
    /// Pure `prefix + logical_key` concatenation; no error conditions.
    pub fn physical_key(&self, logical_key: &str) -> String {
        format!("{}{}", self.prefix, logical_key)
    }

    /// Recovers the logical key from a physical one.
    ///
    /// Returns `None` for keys outside this namespace.
    pub fn strip<'a>(&self, physical_key: &'a str) -> Option<&'a str> {
        physical_key.strip_prefix(self.prefix.as_str())
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new("cache:")
    }
}
