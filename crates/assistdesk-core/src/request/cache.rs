//! Tag-based cache invalidation for list queries.
//!
//! Every list read is keyed by a [`ResourceTag`]. A successful mutation bumps
//! the tag's generation in the shared [`TagRegistry`]; a [`CachedQuery`]
//! remembers the generation it fetched at and refetches on the next read once
//! the two differ. The generation is read before the fetch starts, so an
//! invalidation that lands mid-fetch leaves the fetched value already stale.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Remote resource families that list queries provide and mutations invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceTag {
    TrainingData,
    Feedback,
    DatabaseFiles,
    KnowledgeBaseFiles,
}

impl fmt::Display for ResourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceTag::TrainingData => "TrainingData",
            ResourceTag::Feedback => "Feedback",
            ResourceTag::DatabaseFiles => "DatabaseFiles",
            ResourceTag::KnowledgeBaseFiles => "KnowledgeBaseFiles",
        };
        f.write_str(name)
    }
}

/// Shared per-tag generation counters. Cloning shares the same counters.
#[derive(Clone)]
pub struct TagRegistry {
    generations: Arc<DashMap<ResourceTag, u64>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self {
            generations: Arc::new(DashMap::new()),
        }
    }

    /// Current generation of `tag`; 0 until first invalidated.
    pub fn generation(&self, tag: ResourceTag) -> u64 {
        self.generations.get(&tag).map(|g| *g).unwrap_or(0)
    }

    /// Mark every cached value for `tag` stale. Returns the new generation.
    pub fn invalidate(&self, tag: ResourceTag) -> u64 {
        let generation = {
            let mut entry = self.generations.entry(tag).or_insert(0);
            *entry += 1;
            *entry
        };
        debug!(%tag, generation, "cache tag invalidated");
        generation
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.generations.len())
            .finish()
    }
}

struct CacheEntry<T> {
    generation: u64,
    value: T,
}

/// A single cached list read that provides one tag.
///
/// Concurrent readers are serialized, so a burst of reads after an
/// invalidation issues one fetch.
pub struct CachedQuery<T> {
    tag: ResourceTag,
    registry: TagRegistry,
    slot: Mutex<Option<CacheEntry<T>>>,
}

impl<T: Clone> CachedQuery<T> {
    pub fn new(tag: ResourceTag, registry: TagRegistry) -> Self {
        Self {
            tag,
            registry,
            slot: Mutex::new(None),
        }
    }

    pub fn tag(&self) -> ResourceTag {
        self.tag
    }

    /// Return the cached value, or run `fetch` if there is none or it is stale.
    ///
    /// A failed fetch leaves the previous entry untouched.
    pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut slot = self.slot.lock().await;
        let generation = self.registry.generation(self.tag);

        if let Some(entry) = slot.as_ref() {
            if entry.generation == generation {
                debug!(tag = %self.tag, "cache hit");
                return Ok(entry.value.clone());
            }
        }

        debug!(tag = %self.tag, generation, "cache miss, fetching");
        let value = fetch().await?;
        *slot = Some(CacheEntry {
            generation,
            value: value.clone(),
        });
        Ok(value)
    }
}

#[cfg(test)]
impl<T: Clone> CachedQuery<T> {
    async fn peek(&self) -> Option<T> {
        self.slot.lock().await.as_ref().map(|entry| entry.value.clone())
    }

    async fn is_stale(&self) -> bool {
        let current = self.registry.generation(self.tag);
        match self.slot.lock().await.as_ref() {
            Some(entry) => entry.generation != current,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn counted(calls: &AtomicUsize, value: u32) -> Result<Vec<u32>, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![value])
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let registry = TagRegistry::new();
        let query = CachedQuery::new(ResourceTag::TrainingData, registry);
        let calls = AtomicUsize::new(0);

        assert_eq!(query.get_or_fetch(|| counted(&calls, 1)).await.unwrap(), vec![1]);
        assert_eq!(query.get_or_fetch(|| counted(&calls, 2)).await.unwrap(), vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let registry = TagRegistry::new();
        let query = CachedQuery::new(ResourceTag::Feedback, registry.clone());
        let calls = AtomicUsize::new(0);

        query.get_or_fetch(|| counted(&calls, 1)).await.unwrap();
        assert!(!query.is_stale().await);

        assert_eq!(registry.invalidate(ResourceTag::Feedback), 1);
        assert!(query.is_stale().await);

        assert_eq!(query.get_or_fetch(|| counted(&calls, 2)).await.unwrap(), vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn other_tags_are_unaffected() {
        let registry = TagRegistry::new();
        let query = CachedQuery::new(ResourceTag::DatabaseFiles, registry.clone());
        let calls = AtomicUsize::new(0);

        query.get_or_fetch(|| counted(&calls, 1)).await.unwrap();
        registry.invalidate(ResourceTag::TrainingData);
        query.get_or_fetch(|| counted(&calls, 2)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_during_fetch_marks_result_stale() {
        let registry = TagRegistry::new();
        let query = CachedQuery::new(ResourceTag::TrainingData, registry.clone());

        let value = query
            .get_or_fetch(|| async {
                registry.invalidate(ResourceTag::TrainingData);
                Ok::<_, String>(vec![1])
            })
            .await
            .unwrap();
        assert_eq!(value, vec![1]);
        assert!(query.is_stale().await);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_value() {
        let registry = TagRegistry::new();
        let query = CachedQuery::new(ResourceTag::KnowledgeBaseFiles, registry.clone());

        query.get_or_fetch(|| async { Ok::<_, String>(vec![7]) }).await.unwrap();
        registry.invalidate(ResourceTag::KnowledgeBaseFiles);

        let err = query
            .get_or_fetch(|| async { Err::<Vec<u32>, _>("offline".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "offline");
        assert_eq!(query.peek().await, Some(vec![7]));
    }

    #[tokio::test]
    async fn every_reader_of_a_tag_refetches_after_invalidation() {
        let registry = TagRegistry::new();
        let page = CachedQuery::new(ResourceTag::Feedback, registry.clone());
        let sidebar = CachedQuery::new(ResourceTag::Feedback, registry.clone());
        let calls = AtomicUsize::new(0);

        page.get_or_fetch(|| counted(&calls, 1)).await.unwrap();
        sidebar.get_or_fetch(|| counted(&calls, 1)).await.unwrap();
        registry.invalidate(ResourceTag::Feedback);

        assert_eq!(page.get_or_fetch(|| counted(&calls, 2)).await.unwrap(), vec![2]);
        assert_eq!(sidebar.get_or_fetch(|| counted(&calls, 2)).await.unwrap(), vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
