//! Bounded, single-owner key-value store backing one account kind
//! (pools, vaults, tick arrays, ...). Write-version-ordered: a write only
//! lands if its `(slot, writeVersion)` is strictly newer than what's
//! already there. Capacity eviction, explicit deletion and stale-write
//! rejection are three separate code paths, each counted separately rather
//! than folded into one "write failed" bucket.
//!
//! No `RwLock`, no `DashMap`, no `lazy_static`: this type is owned
//! exclusively by the engine instance that holds it — single writer, no
//! interior mutex. `lru::LruCache` supplies capacity-bounded
//! storage; we never reach for it as a concurrency primitive.

use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

use super::entry::{ApplyOutcome, CacheRecord};
use crate::types::{Origin, Slot, WriteVersion};

const DEFAULT_CAPACITY: usize = 16_384;

pub struct CacheStore<K, V> {
    entries: LruCache<K, CacheRecord<V>>,
    evicted_count: u64,
    deleted_count: u64,
    rejected_count: u64,
}

impl<K: Hash + Eq + Clone, V> CacheStore<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            entries: LruCache::new(capacity),
            evicted_count: 0,
            deleted_count: 0,
            rejected_count: 0,
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|r| &r.value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn evicted_count(&self) -> u64 {
        self.evicted_count
    }

    pub fn deleted_count(&self) -> u64 {
        self.deleted_count
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected_count
    }

    /// Attempts to write `value` under `key`. Rejects ties and regressions
    /// on `(slot, writeVersion)` without touching the existing entry.
    pub fn apply(
        &mut self,
        key: K,
        value: V,
        slot: Slot,
        write_version: WriteVersion,
        origin: Origin,
    ) -> ApplyOutcome {
        if let Some(existing) = self.entries.peek(&key) {
            if !existing.is_superseded_by(slot, write_version) {
                self.rejected_count += 1;
                return ApplyOutcome::Rejected {
                    existing_slot: existing.slot,
                    existing_write_version: existing.write_version,
                };
            }
        }

        let was_full = self.entries.len() == self.entries.cap().get() && !self.entries.contains(&key);
        let record = CacheRecord::new(value, slot, write_version, origin);
        let evicted = self.entries.push(key, record);
        // `push` evicts the LRU victim only when the map was already at
        // capacity and the key being written is new; updates-in-place
        // never evict.
        let did_evict = was_full && evicted.is_some();
        if did_evict {
            self.evicted_count += 1;
        }
        ApplyOutcome::Applied { evicted: did_evict }
    }

    /// Explicit removal, distinct from a capacity eviction.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let removed = self.entries.pop(key);
        if removed.is_some() {
            self.deleted_count += 1;
        }
        removed.map(|r| r.value)
    }

    /// Read-only iteration in LRU recency order, used by `getByPool`-style
    /// queries that need to scan for a key prefix rather than look up a
    /// single key.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, r)| (k, &r.value))
    }
}

impl<K: Hash + Eq + Clone, V> Default for CacheStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strictly_newer_write() {
        let mut store: CacheStore<u8, &str> = CacheStore::new();
        assert_eq!(
            store.apply(1, "a", 10, 0, Origin::Live),
            ApplyOutcome::Applied { evicted: false }
        );
        assert_eq!(
            store.apply(1, "b", 11, 0, Origin::Live),
            ApplyOutcome::Applied { evicted: false }
        );
        assert_eq!(store.get(&1), Some(&"b"));
    }

    #[test]
    fn rejects_tie_and_regression() {
        let mut store: CacheStore<u8, &str> = CacheStore::new();
        store.apply(1, "a", 10, 5, Origin::Live);
        let tie = store.apply(1, "b", 10, 5, Origin::Live);
        assert_eq!(
            tie,
            ApplyOutcome::Rejected {
                existing_slot: 10,
                existing_write_version: 5
            }
        );
        let regression = store.apply(1, "c", 9, 999, Origin::Live);
        assert!(matches!(regression, ApplyOutcome::Rejected { .. }));
        assert_eq!(store.get(&1), Some(&"a"));
        assert_eq!(store.rejected_count(), 2);
    }

    #[test]
    fn capacity_eviction_is_counted_separately_from_deletion() {
        let mut store: CacheStore<u8, &str> = CacheStore::with_capacity(1);
        store.apply(1, "a", 1, 0, Origin::Live);
        let outcome = store.apply(2, "b", 1, 0, Origin::Live);
        assert_eq!(outcome, ApplyOutcome::Applied { evicted: true });
        assert_eq!(store.evicted_count(), 1);
        assert_eq!(store.deleted_count(), 0);

        store.delete(&2);
        assert_eq!(store.deleted_count(), 1);
        assert_eq!(store.evicted_count(), 1);
    }
}
