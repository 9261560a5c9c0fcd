//! Directory of all live caches
//!
//! Every [`NamedCache`](crate::NamedCache) registers itself here at
//! construction. The directory is consulted only for the two bulk
//! operations (reset-all and stats-all); per-entry get/put never touches
//! it, so the hot path is free of any cross-cache contention.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::debug;

/// Directory view of one registered cache, erased over its key/value types
pub(crate) trait ResettableCache: Send + Sync {
    fn display_name(&self) -> &str;
    fn entry_count(&self) -> usize;
    fn clear(&self);
}

static GLOBAL: OnceLock<CacheDirectory> = OnceLock::new();

/// Registry tracking every live cache for bulk reset and statistics
///
/// The host owns the directory and passes it to every
/// [`NamedCache`](crate::NamedCache) constructor; tests create private
/// directories instead of sharing process-wide state. Hosts that want a
/// single process-wide registry use [`CacheDirectory::global`].
///
/// Membership is insertion-ordered and never shrinks: caches register once
/// at construction and live for the process lifetime. Duplicate display
/// names are allowed and are merged in statistics.
#[derive(Default)]
pub struct CacheDirectory {
    members: Mutex<Vec<Arc<dyn ResettableCache>>>,
}

impl CacheDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide directory, allocated on first use
    pub fn global() -> &'static CacheDirectory {
        GLOBAL.get_or_init(CacheDirectory::new)
    }

    /// Directory lock. Guarded sections are shape-only (push/iterate) and
    /// cannot panic; recover from caller-induced poison.
    fn members(&self) -> MutexGuard<'_, Vec<Arc<dyn ResettableCache>>> {
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Called exactly once per cache, from the NamedCache constructor
    pub(crate) fn register(&self, cache: Arc<dyn ResettableCache>) {
        self.members().push(cache);
    }

    /// Clear the contents of every registered cache
    ///
    /// Holds the directory lock across the iteration and takes each
    /// member's own instance lock one at a time, so a put on one cache
    /// proceeds while another is being cleared. The caches themselves stay
    /// registered and usable.
    pub fn reset_all(&self) {
        let members = self.members();
        for member in members.iter() {
            member.clear();
        }
        debug!(caches = members.len(), "reset all caches");
    }

    /// One line per distinct display name, sorted by name
    ///
    /// Each line reports how many caches share the name and their summed
    /// entry count, e.g. `2 button images with 17 entries total`. Sizes are
    /// a point-in-time snapshot and may be momentarily stale against
    /// concurrent mutation.
    pub fn stats(&self) -> Vec<String> {
        let members = self.members();

        let mut by_name: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for member in members.iter() {
            let group = by_name.entry(member.display_name()).or_insert((0, 0));
            group.0 += 1;
            group.1 += member.entry_count();
        }

        by_name
            .iter()
            .map(|(name, (count, total))| format!("{count} {name} with {total} entries total"))
            .collect()
    }

    /// Number of registered caches
    pub fn cache_count(&self) -> usize {
        self.members().len()
    }

    /// Summed entry count across all registered caches (best-effort
    /// snapshot)
    pub fn total_entries(&self) -> usize {
        self.members()
            .iter()
            .map(|member| member.entry_count())
            .sum()
    }
}

impl std::fmt::Debug for CacheDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheDirectory")
            .field("caches", &self.cache_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NamedCache;

    #[test]
    fn test_register_on_construction() {
        let directory = CacheDirectory::new();
        let _a: NamedCache<u32, u32> = NamedCache::new("alpha", &directory);
        let _b: NamedCache<u32, u32> = NamedCache::new("beta", &directory);

        assert_eq!(directory.cache_count(), 2);
    }

    #[test]
    fn test_reset_all_clears_every_cache() {
        let directory = CacheDirectory::new();
        let alpha = NamedCache::new("alpha", &directory);
        let beta = NamedCache::new("beta", &directory);

        alpha.put(1u32, "a");
        beta.put(1u32, "b");

        directory.reset_all();

        assert_eq!(alpha.len(), 0);
        assert_eq!(beta.len(), 0);
    }

    #[test]
    fn test_caches_stay_usable_after_reset() {
        let directory = CacheDirectory::new();
        let cache = NamedCache::new("alpha", &directory);

        cache.put(1u32, "a");
        directory.reset_all();
        cache.put(2u32, "b");

        assert_eq!(cache.get(&2), Some("b"));
        assert_eq!(directory.cache_count(), 1);
    }

    #[test]
    fn test_stats_groups_by_display_name() {
        let directory = CacheDirectory::new();
        let alpha1 = NamedCache::new("alpha", &directory);
        let alpha2 = NamedCache::new("alpha", &directory);
        let _beta: NamedCache<u32, &str> = NamedCache::new("beta", &directory);

        alpha1.put(1u32, "a");
        alpha2.put(1u32, "b");
        alpha2.put(2u32, "c");

        assert_eq!(
            directory.stats(),
            vec![
                "2 alpha with 3 entries total".to_string(),
                "1 beta with 0 entries total".to_string(),
            ]
        );
    }

    #[test]
    fn test_stats_sorted_by_display_name() {
        let directory = CacheDirectory::new();
        let _z: NamedCache<u32, u32> = NamedCache::new("zeta", &directory);
        let _a: NamedCache<u32, u32> = NamedCache::new("alpha", &directory);

        let stats = directory.stats();
        assert!(stats[0].contains("alpha"));
        assert!(stats[1].contains("zeta"));
    }

    #[test]
    fn test_stats_empty_directory() {
        let directory = CacheDirectory::new();
        assert!(directory.stats().is_empty());
    }

    #[test]
    fn test_total_entries() {
        let directory = CacheDirectory::new();
        let a = NamedCache::new("alpha", &directory);
        let b = NamedCache::new("beta", &directory);

        a.put(1u32, "a");
        b.put(1u32, "b");
        b.put(2u32, "c");

        assert_eq!(directory.total_entries(), 3);
    }

    #[test]
    fn test_global_directory_is_shared() {
        assert!(std::ptr::eq(
            CacheDirectory::global(),
            CacheDirectory::global()
        ));
    }

    #[test]
    fn test_directories_are_independent() {
        let first = CacheDirectory::new();
        let second = CacheDirectory::new();
        let in_first = NamedCache::new("alpha", &first);
        let in_second = NamedCache::new("alpha", &second);

        in_first.put(1u32, "a");
        in_second.put(1u32, "b");

        first.reset_all();

        assert_eq!(in_first.len(), 0);
        assert_eq!(in_second.len(), 1);
    }
}
