//! Namespace Statistics Module
//!
//! Introspection report over the live keys under a namespace.

use serde::Serialize;

// == Namespace Stats ==
/// Snapshot of the namespace contents, best effort.
///
/// When the store cannot be reached the report carries zero keys and the
/// failure message instead of an error being raised.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NamespaceStats {
    /// Number of live keys under the namespace
    pub count: usize,
    /// Logical keys (prefix stripped)
    pub keys: Vec<String>,
    /// Whether the store connection was up when the report was taken
    pub connected: bool,
    /// Failure message when the listing could not be completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NamespaceStats {
    /// Builds a report from the logical keys found in the store.
    pub fn from_keys(keys: Vec<String>) -> Self {
        Self {
            count: keys.len(),
            keys,
            connected: true,
            error: None,
        }
    }

    /// Builds a degraded report carrying the failure message.
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            count: 0,
            keys: Vec::new(),
            connected: false,
            error: Some(error.into()),
        }
    }
}
