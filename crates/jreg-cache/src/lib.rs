//! # Identifier LRU Cache
//!
//! A bounded, move-to-front cache from canonical JSON bytes ([`Cval`]) to
//! store-assigned [`Id`]s. The cache is an optimisation layered on top of
//! the store, never a source of truth:
//!
//! - Every cached entry corresponds to a durably committed row.
//! - The cache may lag reality (a row the cache hasn't learned about yet),
//!   but it never lies — a cache hit is always safe to trust without a
//!   round-trip to the store.
//! - Eviction during a concurrent read is fine: the store remains
//!   authoritative, and a miss just falls through to it.
//!
//! Many registrant tasks probe and insert concurrently; contention here is
//! dominated by the store I/O that surrounds each operation, not by cache
//! bookkeeping, so a single mutex guarding the map+list is enough —
//! reaching for a lock-free structure would be solving a problem this
//! workload doesn't have.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use jreg_core::{Cval, Id};
use lru::LruCache;

/// Thread-safe, bounded cache of `Cval -> Id`.
pub struct IdCache {
    inner: Mutex<LruCache<Cval, Id>>,
}

impl IdCache {
    /// Create an empty cache with capacity `capacity`. A `capacity` of `0`
    /// is treated as `1` — this mirrors [`jreg_core::Configuration`]'s own
    /// silent promotion, so a caller that forwards `lru_cache_size`
    /// straight through never has to special-case zero twice.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up `cval`, promoting it to most-recently-used on a hit.
    pub fn probe(&self, cval: &[u8]) -> Option<Id> {
        let mut guard = self.inner.lock().expect("cache mutex poisoned");
        guard.get(cval).copied()
    }

    /// Install `cval -> id`, evicting the least-recently-used entry if the
    /// cache is full. Overwrites any existing mapping for `cval`.
    pub fn insert(&self, cval: Cval, id: Id) {
        let mut guard = self.inner.lock().expect("cache mutex poisoned");
        guard.put(cval, id);
    }

    /// Number of entries currently cached. Exposed for tests and metrics,
    /// not used by the registry engine itself.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_misses_on_empty_cache() {
        let cache = IdCache::new(4);
        assert_eq!(cache.probe(b"{}"), None);
    }

    #[test]
    fn insert_then_probe_hits() {
        let cache = IdCache::new(4);
        cache.insert(b"{\"a\":1}".to_vec(), 7);
        assert_eq!(cache.probe(b"{\"a\":1}"), Some(7));
    }

    #[test]
    fn zero_capacity_promoted_to_one() {
        let cache = IdCache::new(0);
        cache.insert(b"a".to_vec(), 1);
        assert_eq!(cache.probe(b"a"), Some(1));
    }

    #[test]
    fn eviction_drops_least_recently_used() {
        let cache = IdCache::new(2);
        cache.insert(b"a".to_vec(), 1);
        cache.insert(b"b".to_vec(), 2);
        // Touch "a" so "b" becomes the least-recently-used entry.
        assert_eq!(cache.probe(b"a"), Some(1));
        cache.insert(b"c".to_vec(), 3);
        assert_eq!(cache.probe(b"b"), None);
        assert_eq!(cache.probe(b"a"), Some(1));
        assert_eq!(cache.probe(b"c"), Some(3));
    }

    #[test]
    fn insert_overwrites_existing_mapping() {
        let cache = IdCache::new(4);
        cache.insert(b"a".to_vec(), 1);
        cache.insert(b"a".to_vec(), 2);
        assert_eq!(cache.probe(b"a"), Some(2));
        assert_eq!(cache.len(), 1);
    }
}
