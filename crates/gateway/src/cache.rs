//! Read-through cache for collection queries.
//!
//! Site content changes rarely, so query results are kept for a fixed TTL.
//! Any write to a collection drops that collection's cached results. Single
//! document reads and all writes go straight to the inner store.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use mhc_core::types::DocId;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::GatewayError;
use crate::query::{CollectionQuery, Document, Fields};
use crate::store::DocumentStore;

/// Default time a cached query result stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct Entry {
    stored_at: Instant,
    docs: Vec<Document>,
}

pub struct CachedStore<S> {
    inner: S,
    ttl: Duration,
    enabled: bool,
    entries: RwLock<HashMap<String, Entry>>,
}

impl<S: DocumentStore> CachedStore<S> {
    pub fn new(inner: S, ttl: Duration, enabled: bool) -> Self {
        Self {
            inner,
            ttl,
            enabled,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached result for `collection`.
    pub async fn invalidate(&self, collection: &str) {
        let prefix = format!("{collection}|");
        self.entries
            .write()
            .await
            .retain(|key, _| !key.starts_with(&prefix));
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for CachedStore<S> {
    async fn add_document(&self, collection: &str, data: Fields) -> Result<DocId, GatewayError> {
        let id = self.inner.add_document(collection, data).await?;
        self.invalidate(collection).await;
        Ok(id)
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Fields,
    ) -> Result<(), GatewayError> {
        self.inner.set_document(collection, id, data).await?;
        self.invalidate(collection).await;
        Ok(())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Fields,
    ) -> Result<(), GatewayError> {
        self.inner.update_document(collection, id, data).await?;
        self.invalidate(collection).await;
        Ok(())
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, GatewayError> {
        self.inner.get_document(collection, id).await
    }

    async fn query(&self, query: &CollectionQuery) -> Result<Vec<Document>, GatewayError> {
        if !self.enabled {
            return self.inner.query(query).await;
        }

        let key = query.cache_key();
        if let Some(entry) = self.entries.read().await.get(&key) {
            if entry.stored_at.elapsed() < self.ttl {
                tracing::trace!(key = %key, "Query cache hit");
                return Ok(entry.docs.clone());
            }
        }

        // Failures are not cached, so the next read retries the store.
        let docs = self.inner.query(query).await?;
        self.entries.write().await.insert(
            key,
            Entry {
                stored_at: Instant::now(),
                docs: docs.clone(),
            },
        );
        Ok(docs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::memory::MemoryStore;

    fn fields(title: &str) -> Fields {
        let mut f = Fields::new();
        f.insert("title".into(), json!(title));
        f
    }

    fn cached(enabled: bool) -> (Arc<MemoryStore>, CachedStore<Arc<MemoryStore>>) {
        let memory = Arc::new(MemoryStore::new());
        let store = CachedStore::new(memory.clone(), Duration::from_secs(60), enabled);
        (memory, store)
    }

    #[tokio::test(start_paused = true)]
    async fn serves_cached_results_until_ttl() {
        let (memory, store) = cached(true);
        memory.seed("awards", "a", fields("Best Builder"));
        let query = CollectionQuery::new("awards");

        assert_eq!(store.query(&query).await.unwrap().len(), 1);
        // Seeding bypasses the cache, so the cached result is still served.
        memory.seed("awards", "b", fields("Safety"));
        assert_eq!(store.query(&query).await.unwrap().len(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(store.query(&query).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn writes_invalidate_the_collection() {
        let (_memory, store) = cached(true);
        let query = CollectionQuery::new("blog_posts");
        assert!(store.query(&query).await.unwrap().is_empty());

        store.add_document("blog_posts", fields("Hello")).await.unwrap();
        assert_eq!(store.query(&query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalidation_is_scoped_to_one_collection() {
        let (_memory, store) = cached(true);
        store.query(&CollectionQuery::new("awards")).await.unwrap();
        store.query(&CollectionQuery::new("team_members")).await.unwrap();
        store.invalidate("awards").await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn disabled_cache_always_reads_through() {
        let (memory, store) = cached(false);
        let query = CollectionQuery::new("awards");
        store.query(&query).await.unwrap();
        memory.seed("awards", "a", fields("New"));
        assert_eq!(store.query(&query).await.unwrap().len(), 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (memory, store) = cached(true);
        let query = CollectionQuery::new("awards");
        memory.set_failing(true);
        assert!(store.query(&query).await.is_err());
        memory.set_failing(false);
        assert!(store.query(&query).await.is_ok());
    }
}
