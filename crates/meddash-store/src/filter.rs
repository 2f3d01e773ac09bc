//! The filter engine: derives the visible subset of the roster.
//!
//! Filtering is a pure, order-preserving function of the collection and the
//! criteria:
//!
//! 1. a non-empty search term keeps records whose name, specialty, email or
//!    address contains it, ignoring case;
//! 2. a specialty other than `"all"` keeps exact, case-sensitive matches;
//! 3. a status other than `"all"` keeps exact matches on the status wire name.
//!
//! The steps compose by AND. Unset criteria select everything.
//!
//! # Example
//!
//! ```rust
//! use meddash_model::{seed_roster, DoctorFilter};
//! use meddash_store::filter;
//!
//! let roster = seed_roster();
//! let found = filter::apply(&roster, &DoctorFilter::new().with_search("chen"));
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].name, "Dr. Michael Chen");
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use meddash_model::{Doctor, DoctorFilter};

use crate::cache::{CacheStats, FilterCache, FilterKey};
use crate::config::FilterCacheConfig;

/// Criteria with the search term lower-cased once up front.
struct Compiled<'a> {
    search: Option<String>,
    specialty: Option<&'a str>,
    status: Option<&'a str>,
}

impl<'a> Compiled<'a> {
    fn new(criteria: &'a DoctorFilter) -> Self {
        Self {
            search: criteria.search_term(),
            specialty: criteria.specialty_constraint(),
            status: criteria.status_constraint(),
        }
    }

    fn matches(&self, doctor: &Doctor) -> bool {
        if let Some(term) = &self.search {
            let hit = [
                &doctor.name,
                &doctor.specialty,
                &doctor.email,
                &doctor.address,
            ]
            .into_iter()
            .any(|field| field.to_lowercase().contains(term.as_str()));
            if !hit {
                return false;
            }
        }
        if let Some(specialty) = self.specialty {
            if doctor.specialty != specialty {
                return false;
            }
        }
        if let Some(status) = self.status {
            if doctor.status.as_str() != status {
                return false;
            }
        }
        true
    }
}

/// Returns true if `doctor` satisfies `criteria`.
pub fn matches(doctor: &Doctor, criteria: &DoctorFilter) -> bool {
    Compiled::new(criteria).matches(doctor)
}

/// Returns the positions in `collection` of the records that satisfy `criteria`.
pub fn positions(collection: &[Doctor], criteria: &DoctorFilter) -> Vec<usize> {
    let compiled = Compiled::new(criteria);
    collection
        .iter()
        .enumerate()
        .filter(|(_, doctor)| compiled.matches(doctor))
        .map(|(index, _)| index)
        .collect()
}

/// Returns the records of `collection` that satisfy `criteria`, in order.
pub fn apply(collection: &[Doctor], criteria: &DoctorFilter) -> Vec<Doctor> {
    let compiled = Compiled::new(criteria);
    collection
        .iter()
        .filter(|doctor| compiled.matches(doctor))
        .cloned()
        .collect()
}

/// Counters for a [`FilterEngine`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Number of derivations requested.
    pub derivations: u64,
    /// Cache counters (zero when caching is disabled).
    pub cache: CacheStats,
}

/// Holds the last-applied criteria and derives visible subsets from them.
///
/// The engine never stores or mutates the collection; callers pass it on
/// every derivation.
#[derive(Debug, Default)]
pub struct FilterEngine {
    criteria: DoctorFilter,
    cache: Option<FilterCache>,
    derivations: AtomicU64,
}

impl FilterEngine {
    /// Creates an engine with unrestricted criteria and no cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine that caches derivations.
    pub fn with_cache(config: &FilterCacheConfig) -> Self {
        Self {
            cache: Some(FilterCache::new(config)),
            ..Self::default()
        }
    }

    /// Returns the last-applied criteria.
    pub fn criteria(&self) -> &DoctorFilter {
        &self.criteria
    }

    /// Replaces the criteria.
    pub fn set_criteria(&mut self, criteria: DoctorFilter) {
        self.criteria = criteria;
    }

    /// Derives the visible subset of `collection` under the current criteria.
    ///
    /// With caching enabled, [`invalidate`](Self::invalidate) must be called
    /// whenever `collection` changes.
    pub fn derive(&self, collection: &[Doctor]) -> Vec<Doctor> {
        self.derivations.fetch_add(1, Ordering::Relaxed);

        if self.criteria.is_unrestricted() {
            return collection.to_vec();
        }

        let Some(cache) = &self.cache else {
            return apply(collection, &self.criteria);
        };

        let key = FilterKey::new(&self.criteria);
        let selected = match cache.get(&key) {
            Some(hit) => hit,
            None => {
                let fresh: Arc<[usize]> = positions(collection, &self.criteria).into();
                cache.insert(key, Arc::clone(&fresh));
                fresh
            }
        };
        selected
            .iter()
            .filter_map(|&index| collection.get(index).cloned())
            .collect()
    }

    /// Drops cached derivations after a collection change.
    pub fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Returns the engine counters.
    pub fn stats(&self) -> FilterStats {
        FilterStats {
            derivations: self.derivations.load(Ordering::Relaxed),
            cache: self.cache.as_ref().map(FilterCache::stats).unwrap_or_default(),
        }
    }
}
