//! Keyed query cache with staleness and coalesced fetches.
//!
//! Entries carry the instant they were written; an entry older than
//! `stale_after` is still readable but is refetched on the next access.
//! Fetches for the same key are serialized through a per-key gate, so a
//! caller that arrives while a fetch is in flight waits for it and reuses
//! its result when that result is fresh. Failed fetches leave the entry
//! untouched. The last fetch to complete wins.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    updated_at: Instant,
}

#[derive(Clone)]
pub struct QueryCache<V> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    gates: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
    stale_after: Duration,
}

impl<V: Clone + Send + Sync> QueryCache<V> {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            gates: Arc::new(Mutex::new(HashMap::new())),
            stale_after,
        }
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// Latest value for `key`, fresh or not.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.entries.read().await.get(key).map(|e| e.value.clone())
    }

    /// Value for `key` only while it is still fresh.
    pub async fn fresh(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| e.updated_at.elapsed() < self.stale_after)
            .map(|e| e.value.clone())
    }

    /// True when there is no entry or the entry has gone stale.
    pub async fn is_stale(&self, key: &str) -> bool {
        self.fresh(key).await.is_none()
    }

    pub async fn insert(&self, key: &str, value: V) {
        self.entries.write().await.insert(
            key.to_string(),
            CacheEntry {
                value,
                updated_at: Instant::now(),
            },
        );
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Returns the fresh value, or runs `fetch` and caches its success.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.fresh(key).await {
            return Ok(value);
        }

        let gate = self.gate(key).await;
        let _guard = gate.lock().await;

        // Another caller may have refreshed while we waited on the gate.
        if let Some(value) = self.fresh(key).await {
            return Ok(value);
        }

        self.store(key, fetch().await).await
    }

    /// Runs `fetch` regardless of freshness and caches its success.
    pub async fn refetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let gate = self.gate(key).await;
        let _guard = gate.lock().await;

        self.store(key, fetch().await).await
    }

    async fn store<E>(&self, key: &str, result: Result<V, E>) -> Result<V, E> {
        let value = result?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    async fn gate(&self, key: &str) -> Arc<Mutex<()>> {
        self.gates
            .lock()
            .await
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const KEY: &str = "/api/admin/settings";

    #[tokio::test(start_paused = true)]
    async fn test_entry_goes_stale() {
        let cache = QueryCache::new(Duration::from_secs(1));
        cache.insert(KEY, 7u32).await;

        assert_eq!(cache.fresh(KEY).await, Some(7));
        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(!cache.is_stale(KEY).await);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(cache.is_stale(KEY).await);
        assert_eq!(cache.fresh(KEY).await, None);
        assert_eq!(cache.get(KEY).await, Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_or_fetch_uses_fresh_entry() {
        let cache = QueryCache::new(Duration::from_secs(1));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_fetch(KEY, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(1u32)
                })
                .await;
            assert_eq!(value, Ok(1));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        let value = cache
            .get_or_fetch(KEY, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(2u32)
            })
            .await;
        assert_eq!(value, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_value() {
        let cache = QueryCache::new(Duration::ZERO);
        cache.insert(KEY, 1u32).await;

        let result = cache.refetch(KEY, || async { Err::<u32, _>("boom") }).await;
        assert_eq!(result, Err("boom"));
        assert_eq!(cache.get(KEY).await, Some(1));
    }

    #[tokio::test]
    async fn test_refetch_ignores_freshness() {
        let cache = QueryCache::new(Duration::from_secs(3600));
        cache.insert(KEY, 1u32).await;

        let value = cache.refetch(KEY, || async { Ok::<_, ()>(2u32) }).await;
        assert_eq!(value, Ok(2));
        assert_eq!(cache.fresh(KEY).await, Some(2));
    }

    #[tokio::test]
    async fn test_overlapping_fetches_are_coalesced() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        let fetch = |calls: Arc<AtomicUsize>| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, ()>(5u32)
        };

        let (a, b) = tokio::join!(
            cache.get_or_fetch(KEY, || fetch(calls.clone())),
            cache.get_or_fetch(KEY, || fetch(calls.clone())),
        );

        assert_eq!(a, Ok(5));
        assert_eq!(b, Ok(5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.insert(KEY, 1u32).await;
        cache.invalidate(KEY).await;
        assert_eq!(cache.get(KEY).await, None);
    }
}
