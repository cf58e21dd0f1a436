//! Invalidation Coordinator
//!
//! Central table mapping each mutating operation to the cache keys whose
//! truth it affects. Mutating handlers call `invalidate_after` once their
//! mutation has succeeded; a failed deletion is logged and swallowed, since
//! the stale entry ages out by TTL and can never become permanently wrong.

use tracing::{debug, warn};

use crate::cache::Cache;

// == Mutation ==
/// State-changing operations the explorer proxies to the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// A transaction was submitted to the pending pool
    SubmitTransaction,
    /// A block was mined, folding pending transactions into the chain
    MineBlock,
}

impl Mutation {
    /// Logical keys whose cached values are derived from the mutated
    /// resource.
    pub fn invalidated_keys(self) -> &'static [&'static str] {
        match self {
            Mutation::SubmitTransaction => &["/api/transactions"],
            Mutation::MineBlock => &[
                "/api/blocks",
                "/api/transactions",
                "/api/stats",
                "/api/coin/info",
            ],
        }
    }
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Mutation::SubmitTransaction => "submit transaction",
            Mutation::MineBlock => "mine block",
        };
        write!(f, "{}", label)
    }
}

// == Invalidate After ==
/// Deletes every cache key invalidated by `mutation`.
///
/// Called after the mutation has succeeded upstream. Store failures are
/// logged, never propagated; the worst case is staleness bounded by the
/// entry's TTL.
pub async fn invalidate_after(cache: &Cache, mutation: Mutation) {
    for key in mutation.invalidated_keys() {
        if cache.delete(key).await {
            debug!(%mutation, key, "cache invalidated");
        } else {
            warn!(%mutation, key, "cache invalidation failed, entry ages out by ttl");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Namespace;
    use crate::store::MemoryStore;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn test_cache(store: Arc<MemoryStore>) -> Cache {
        Cache::new(
            store,
            Namespace::new("cache:"),
            60,
            Duration::from_millis(2000),
        )
    }

    #[test]
    fn test_mutation_tables() {
        assert_eq!(
            Mutation::SubmitTransaction.invalidated_keys(),
            &["/api/transactions"]
        );
        assert!(Mutation::MineBlock
            .invalidated_keys()
            .contains(&"/api/coin/info"));
        assert_eq!(Mutation::MineBlock.invalidated_keys().len(), 4);
    }

    #[tokio::test]
    async fn test_submit_transaction_invalidates_only_transactions() {
        let store = Arc::new(MemoryStore::connected());
        let cache = test_cache(store);

        cache.set("/api/transactions", &json!([1]), None).await;
        cache.set("/api/blocks", &json!([2]), None).await;

        invalidate_after(&cache, Mutation::SubmitTransaction).await;

        assert_eq!(cache.get::<Value>("/api/transactions").await, None);
        assert!(cache.get::<Value>("/api/blocks").await.is_some());
    }

    #[tokio::test]
    async fn test_mine_block_invalidates_derived_keys() {
        let store = Arc::new(MemoryStore::connected());
        let cache = test_cache(store);

        for key in Mutation::MineBlock.invalidated_keys() {
            cache.set(key, &json!("stale"), None).await;
        }

        invalidate_after(&cache, Mutation::MineBlock).await;

        for key in Mutation::MineBlock.invalidated_keys() {
            assert_eq!(cache.get::<Value>(key).await, None);
        }
    }

    #[tokio::test]
    async fn test_invalidation_failure_is_swallowed() {
        let store = Arc::new(MemoryStore::new());
        let cache = test_cache(store);

        // Store is disconnected; this must not panic or error.
        invalidate_after(&cache, Mutation::MineBlock).await;
    }
}
