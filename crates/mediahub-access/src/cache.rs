//! Per-request lookup cache.
//!
//! Lives inside a [`RequestContext`](crate::RequestContext), so entries are
//! dropped with the request. Entries are also keyed by the principal that
//! caused the lookup, so a context reused for another principal never sees
//! them.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::Mutex;

/// `(principal id, collection, document id)`
type Key = (String, String, String);

/// Results of delegation lookups already made for this request.
///
/// Stores `None` for confirmed misses so a not-found parent is not fetched
/// twice either. Failures are never stored.
pub(crate) struct LookupCache {
    entries: Mutex<HashMap<Key, Option<Value>>>,
}

impl LookupCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached outcome, or `None` if `principal` never looked this document up.
    pub(crate) async fn get(
        &self,
        principal: &str,
        collection: &str,
        id: &str,
    ) -> Option<Option<Value>> {
        let entries = self.entries.lock().await;
        entries.get(&key(principal, collection, id)).cloned()
    }

    pub(crate) async fn insert(
        &self,
        principal: &str,
        collection: &str,
        id: &str,
        document: Option<Value>,
    ) {
        let mut entries = self.entries.lock().await;
        entries.insert(key(principal, collection, id), document);
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

fn key(principal: &str, collection: &str, id: &str) -> Key {
    (principal.to_string(), collection.to_string(), id.to_string())
}

impl std::fmt::Debug for LookupCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_hit_miss_and_negative_entries() {
        let cache = LookupCache::new();
        assert_eq!(cache.get("u1", "groups", "g1").await, None);

        cache.insert("u1", "groups", "g1", Some(json!({"id": "g1"}))).await;
        cache.insert("u1", "groups", "g2", None).await;

        assert_eq!(cache.get("u1", "groups", "g1").await, Some(Some(json!({"id": "g1"}))));
        assert_eq!(cache.get("u1", "groups", "g2").await, Some(None));
        assert_eq!(cache.get("u1", "chats", "g1").await, None);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_entries_are_per_principal() {
        let cache = LookupCache::new();
        cache.insert("a1", "groups", "g1", Some(json!({"id": "g1"}))).await;

        assert!(cache.get("a1", "groups", "g1").await.is_some());
        assert_eq!(cache.get("b1", "groups", "g1").await, None);
    }
}
