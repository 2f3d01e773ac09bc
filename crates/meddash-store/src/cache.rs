//! Filter result caching.
//!
//! Caches the positions selected by a filter derivation, keyed by the
//! normalized criteria. Entries are only valid for the collection they were
//! computed from; the owner clears the cache whenever the collection changes.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use meddash_model::DoctorFilter;
use parking_lot::Mutex;

use crate::config::FilterCacheConfig;

/// Cache key: the criteria in effect.
///
/// Built from the normalized constraints, so `"Chen"` and `"chen"`, or an
/// unset status and `"all"`, share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterKey {
    search: Option<String>,
    specialty: Option<String>,
    status: Option<String>,
}

impl FilterKey {
    /// Builds the key for `criteria`.
    pub fn new(criteria: &DoctorFilter) -> Self {
        Self {
            search: criteria.search_term(),
            specialty: criteria.specialty_constraint().map(str::to_string),
            status: criteria.status_constraint().map(str::to_string),
        }
    }
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that had to derive.
    pub misses: u64,
}

impl CacheStats {
    /// Returns the hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// LRU cache of filter derivations.
pub struct FilterCache {
    inner: Mutex<LruCache<FilterKey, Arc<[usize]>>>,
    stats: Mutex<CacheStats>,
}

impl FilterCache {
    /// Creates a cache with the given configuration.
    pub fn new(config: &FilterCacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Returns the cached positions for `key`, counting a hit or a miss.
    pub fn get(&self, key: &FilterKey) -> Option<Arc<[usize]>> {
        let found = self.inner.lock().get(key).cloned();
        let mut stats = self.stats.lock();
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    /// Stores the positions derived for `key`.
    pub fn insert(&self, key: FilterKey, positions: Arc<[usize]>) {
        self.inner.lock().put(key, positions);
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the hit and miss counters.
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }
}

impl std::fmt::Debug for FilterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCache")
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
