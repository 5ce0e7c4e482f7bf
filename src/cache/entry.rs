//! A single cached record plus the `(slot, writeVersion)` ordering pair
//! that decides whether a new write supersedes it. Grounded on the
//! teacher's `common::cache::CacheEntry<T>` shape (value + bookkeeping
//! field) in `common/cache.rs`, stripped of its TTL/expiry fields — this
//! cache orders by write recency, not by wall-clock age.

use crate::types::{Origin, Slot, WriteVersion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord<V> {
    pub value: V,
    pub slot: Slot,
    pub write_version: WriteVersion,
    pub origin: Origin,
}

impl<V> CacheRecord<V> {
    pub fn new(value: V, slot: Slot, write_version: WriteVersion, origin: Origin) -> Self {
        Self {
            value,
            slot,
            write_version,
            origin,
        }
    }

    /// `true` if `(slot, write_version)` is strictly newer than this
    /// record's — the only condition under which a write is accepted.
    /// Ties are rejected, not merely deduplicated: a same-(slot,
    /// writeVersion) write is treated as a stale retransmit, not a no-op
    /// success.
    pub fn is_superseded_by(&self, slot: Slot, write_version: WriteVersion) -> bool {
        (slot, write_version) > (self.slot, self.write_version)
    }
}

/// Outcome of a single `apply()` call, reported to the caller and echoed
/// into the trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { evicted: bool },
    Rejected {
        existing_slot: Slot,
        existing_write_version: WriteVersion,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_newer_slot_supersedes() {
        let r = CacheRecord::new(1u8, 10, 5, Origin::Live);
        assert!(r.is_superseded_by(11, 0));
    }

    #[test]
    fn same_slot_higher_write_version_supersedes() {
        let r = CacheRecord::new(1u8, 10, 5, Origin::Live);
        assert!(r.is_superseded_by(10, 6));
    }

    #[test]
    fn tie_does_not_supersede() {
        let r = CacheRecord::new(1u8, 10, 5, Origin::Live);
        assert!(!r.is_superseded_by(10, 5));
    }

    #[test]
    fn older_slot_does_not_supersede_even_with_higher_write_version() {
        let r = CacheRecord::new(1u8, 10, 5, Origin::Live);
        assert!(!r.is_superseded_by(9, 999));
    }
}
