//! Named, lazily-backed caches
//!
//! A [`NamedCache`] is the per-subsystem handle: constructed once at
//! subsystem initialization, registered with a [`CacheDirectory`] in the
//! same step, then used directly for get/put for the rest of the process
//! lifetime. The backing store is allocated on the first write, so a cache
//! that is only ever queried costs nothing beyond the handle.

use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::directory::{CacheDirectory, ResettableCache};
use crate::store::{MapStats, MemorySensitiveMap};

/// A lazily-backed key→value cache tagged with a grouping name
///
/// The handle is cheap to clone; clones share the same underlying cache.
/// All operations on one cache are serialized through its instance lock and
/// are independent of every other cache.
///
/// Values are cloned out on `get`, so large artifacts (pixel buffers,
/// rendered images) should be wrapped in `Arc` by the caller.
///
/// # Example
/// ```
/// use render_cache::{CacheDirectory, NamedCache};
///
/// let directory = CacheDirectory::new();
/// let images: NamedCache<u64, &str> = NamedCache::new("button images", &directory);
///
/// images.put(7, "pixels");
/// assert_eq!(images.get(&7), Some("pixels"));
///
/// directory.reset_all();
/// assert_eq!(images.get(&7), None);
/// ```
pub struct NamedCache<K, V> {
    inner: Arc<CacheInner<K, V>>,
}

impl<K, V> Clone for NamedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

pub(crate) struct CacheInner<K, V> {
    display_name: String,
    config: CacheConfig,
    /// `None` until the first put allocates the backing store; `Some`
    /// forever after. Reads never drive the transition.
    store: Mutex<Option<MemorySensitiveMap<K, V>>>,
}

impl<K, V> CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Instance lock. No guarded section in this crate can panic, so a
    /// poisoned lock only arises from caller code (e.g. a panicking `Hash`
    /// impl); recover the data rather than poisoning every later operation.
    fn lock(&self) -> MutexGuard<'_, Option<MemorySensitiveMap<K, V>>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clear_store(&self) {
        if let Some(store) = self.lock().as_mut() {
            store.clear();
        }
    }

    fn store_len(&self) -> usize {
        self.lock().as_ref().map_or(0, |store| store.len())
    }
}

impl<K, V> NamedCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    /// Create a cache and register it with `directory`
    ///
    /// Registration completes before this returns: a concurrent
    /// `reset_all()` or `stats()` either runs entirely before the cache
    /// exists or sees it as a member.
    ///
    /// `display_name` is used only for grouping in directory statistics and
    /// need not be unique.
    pub fn new(display_name: impl Into<String>, directory: &CacheDirectory) -> Self {
        Self::with_config(display_name, directory, CacheConfig::default())
    }

    /// As [`new`](Self::new), with explicit budgets for the backing store
    pub fn with_config(
        display_name: impl Into<String>,
        directory: &CacheDirectory,
        config: CacheConfig,
    ) -> Self {
        let inner = Arc::new(CacheInner {
            display_name: display_name.into(),
            config,
            store: Mutex::new(None),
        });
        directory.register(inner.clone());
        debug!(name = %inner.display_name, "registered cache");
        Self { inner }
    }

    /// Grouping name of this cache
    pub fn display_name(&self) -> &str {
        &self.inner.display_name
    }

    /// Store an association, allocating the backing store on first use
    pub fn put(&self, key: K, value: V) {
        self.put_with_size(key, value, 0);
    }

    /// As [`put`](Self::put), declaring a weight counted against the byte
    /// budget
    pub fn put_with_size(&self, key: K, value: V, size_bytes: usize) {
        let mut guard = self.inner.lock();
        let store = guard.get_or_insert_with(|| {
            trace!(name = %self.inner.display_name, "allocating backing store");
            MemorySensitiveMap::with_config(self.inner.config.clone())
        });
        store.put_with_size(key, value, size_bytes);
    }

    /// Look up the value for `key`
    ///
    /// `None` means never stored, or discarded since storage: a valid
    /// outcome, not an error. Does not allocate the backing store.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner
            .lock()
            .as_mut()
            .and_then(|store| store.get(key).cloned())
    }

    /// True iff `get` would currently return a value
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner
            .lock()
            .as_ref()
            .is_some_and(|store| store.contains_key(key))
    }

    /// Count of currently retrievable entries
    pub fn len(&self) -> usize {
        self.inner.store_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all entries
    ///
    /// The backing store (once allocated) stays allocated, so every
    /// existing handle keeps working after a clear or a directory-wide
    /// reset.
    pub fn clear(&self) {
        self.inner.clear_store();
    }

    /// Snapshot of the backing store's counters (zeroed until the first
    /// put)
    pub fn stats(&self) -> MapStats {
        self.inner
            .lock()
            .as_ref()
            .map_or_else(MapStats::default, |store| store.stats())
    }
}

impl<K, V> ResettableCache for CacheInner<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn entry_count(&self) -> usize {
        self.store_len()
    }

    fn clear(&self) {
        self.clear_store();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_backed<K: Eq + Hash + Clone, V>(cache: &NamedCache<K, V>) -> bool {
        cache.inner.lock().is_some()
    }

    #[test]
    fn test_fresh_cache_reads_empty_without_allocating() {
        let directory = CacheDirectory::new();
        let cache: NamedCache<u32, String> = NamedCache::new("fresh", &directory);

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
        assert!(!cache.contains_key(&1));
        assert!(!is_backed(&cache));
    }

    #[test]
    fn test_first_put_allocates_backing_store() {
        let directory = CacheDirectory::new();
        let cache = NamedCache::new("lazy", &directory);

        cache.put(1u32, "one");
        assert!(is_backed(&cache));
        assert_eq!(cache.get(&1), Some("one"));
    }

    #[test]
    fn test_last_write_wins() {
        let directory = CacheDirectory::new();
        let cache = NamedCache::new("overwrite", &directory);

        cache.put(1u32, "first");
        cache.put(1u32, "second");

        assert_eq!(cache.get(&1), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_retains_backing_store() {
        let directory = CacheDirectory::new();
        let cache = NamedCache::new("reusable", &directory);

        cache.put(1u32, "one");
        cache.clear();

        assert!(is_backed(&cache));
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&1), None);

        cache.put(2, "two");
        assert_eq!(cache.get(&2), Some("two"));
    }

    #[test]
    fn test_clone_handles_share_state() {
        let directory = CacheDirectory::new();
        let cache = NamedCache::new("shared", &directory);
        let other = cache.clone();

        cache.put(1u32, "one");
        assert_eq!(other.get(&1), Some("one"));

        other.clear();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_stats_zeroed_until_first_put() {
        let directory = CacheDirectory::new();
        let cache: NamedCache<u32, u32> = NamedCache::new("counters", &directory);

        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 0);

        cache.put(1, 10);
        cache.get(&1);
        cache.get(&2);

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_weighted_puts_respect_byte_budget() {
        let directory = CacheDirectory::new();
        let cache = NamedCache::with_config(
            "weighted",
            &directory,
            CacheConfig {
                max_entries: 100,
                max_bytes: 100,
            },
        );

        cache.put_with_size(1u32, "a", 60);
        cache.put_with_size(2u32, "b", 60); // evicts key 1

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some("b"));
    }
}
