use std::{collections::HashMap, fmt::Display, hash::Hash, sync::Arc};

use tokio::sync::RwLock;

use crate::models::RecommendationKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Recommendation list for an exact title under one similarity kind
    Recommendations(RecommendationKind, String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Recommendations(kind, title) => write!(f, "recs:{}:{}", kind, title),
        }
    }
}

/// Unbounded, process-lifetime memo table.
///
/// Cloning yields another handle to the same table. Entries are never evicted.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    entries: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for MemoCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Display,
    V: Clone,
{
    /// Returns a clone of the cached value, if any
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        let hit = entries.get(key).cloned();
        if hit.is_some() {
            tracing::debug!(key = %key, "Memo cache hit");
        }
        hit
    }

    /// Stores a value, replacing any previous entry for the key
    pub async fn insert(&self, key: K, value: V) {
        tracing::debug!(key = %key, "Memo cache store");
        self.entries.write().await.insert(key, value);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cached;
    use crate::error::{AppError, AppResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cache_key_display() {
        let key = CacheKey::Recommendations(RecommendationKind::Content, "Naruto".to_string());
        assert_eq!(format!("{}", key), "recs:content:Naruto");
    }

    #[test]
    fn test_cache_key_keeps_title_case() {
        let key = CacheKey::Recommendations(
            RecommendationKind::Collaborative,
            "Steins;Gate".to_string(),
        );
        assert_eq!(format!("{}", key), "recs:collaborative:Steins;Gate");
    }

    #[test]
    fn test_get_after_insert() {
        tokio_test::block_on(async {
            let cache: MemoCache<String, Vec<u32>> = MemoCache::new();
            assert_eq!(cache.get(&"a".to_string()).await, None);

            cache.insert("a".to_string(), vec![1, 2]).await;
            assert_eq!(cache.get(&"a".to_string()).await, Some(vec![1, 2]));
            assert_eq!(cache.len().await, 1);
        });
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache: MemoCache<String, u32> = MemoCache::new();
        let handle = cache.clone();

        handle.insert("shared".to_string(), 7).await;

        assert_eq!(cache.get(&"shared".to_string()).await, Some(7));
    }

    async fn compute_once(
        cache: &MemoCache<String, u32>,
        calls: &AtomicUsize,
        key: &str,
    ) -> AppResult<u32> {
        cached!(cache, key.to_string(), async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AppError>(42)
        })
    }

    #[tokio::test]
    async fn test_cached_macro_computes_once() {
        let cache = MemoCache::new();
        let calls = AtomicUsize::new(0);

        assert_eq!(compute_once(&cache, &calls, "answer").await.unwrap(), 42);
        assert_eq!(compute_once(&cache, &calls, "answer").await.unwrap(), 42);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    async fn always_missing(cache: &MemoCache<String, u32>) -> AppResult<u32> {
        cached!(cache, "missing".to_string(), async {
            Err::<u32, _>(AppError::NotFound("missing".to_string()))
        })
    }

    #[tokio::test]
    async fn test_cached_macro_does_not_store_errors() {
        let cache: MemoCache<String, u32> = MemoCache::new();

        assert!(always_missing(&cache).await.is_err());
        assert!(cache.is_empty().await);
    }
}
