//! Sorted record store.
//!
//! Entries live in a single `Vec` kept sorted by `(group, index)`. Point
//! lookups are a binary search; because the order is group-major, all
//! entries of one group occupy a contiguous sub-range, so group-wide
//! operations resolve to a range lookup plus one linear pass.
//!
//! Removal is two-phase: callers condemn entries in place (release the
//! payload, null the node pointer) and then run a single [`RecordStore::compact`]
//! pass per operation, which shifts survivors left in one sweep instead of
//! paying a shift per deletion.

use crate::entry::CacheEntry;
use crate::key::RecordId;
use core::fmt;
use core::ops::Range;

/// Array of cache entries, always sorted by [`RecordId`].
pub(crate) struct RecordStore {
    entries: Vec<CacheEntry>,
}

impl RecordStore {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries, including any condemned slots awaiting compaction.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binary search for `key`.
    ///
    /// `Ok(pos)` is the entry's position; `Err(pos)` is the insertion point
    /// that keeps the store sorted.
    #[inline]
    pub(crate) fn find(&self, key: RecordId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&key, |e| e.key)
    }

    /// The contiguous range holding every entry of `group`, or `None` if
    /// the group has no entries.
    ///
    /// Probes the group's smallest and largest possible keys with two
    /// partition-point searches. Correctness rests on the contiguity
    /// invariant, which is asserted in debug builds rather than trusted.
    pub(crate) fn range_for_group(&self, group: u32) -> Option<Range<usize>> {
        let left = self
            .entries
            .partition_point(|e| e.key < RecordId::group_min(group));
        let right = self
            .entries
            .partition_point(|e| e.key <= RecordId::group_max(group));
        if left == right {
            return None;
        }

        debug_assert!(
            self.entries[left..right].iter().all(|e| e.key.group == group),
            "group {group} range contains a foreign entry"
        );
        debug_assert!(
            left == 0 || self.entries[left - 1].key.group != group,
            "group {group} range misses a leading entry"
        );
        debug_assert!(
            right == self.entries.len() || self.entries[right].key.group != group,
            "group {group} range misses a trailing entry"
        );

        Some(left..right)
    }

    /// Inserts `entry` at `pos`, shifting the tail right.
    ///
    /// `pos` must be the insertion point reported by [`RecordStore::find`]
    /// for `entry.key`, or the sort invariant breaks.
    #[inline]
    pub(crate) fn insert(&mut self, pos: usize, entry: CacheEntry) {
        debug_assert!(pos == 0 || self.entries[pos - 1].key < entry.key);
        debug_assert!(pos == self.entries.len() || entry.key < self.entries[pos].key);
        self.entries.insert(pos, entry);
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, pos: usize) -> &mut CacheEntry {
        &mut self.entries[pos]
    }

    /// Mutable view of a range, used for group-wide passes.
    #[inline]
    pub(crate) fn slice_mut(&mut self, range: Range<usize>) -> &mut [CacheEntry] {
        &mut self.entries[range]
    }

    /// Sweeps out condemned slots in one pass, preserving order.
    ///
    /// Shrinks the backing allocation only once the live count has fallen
    /// to half of it, as hysteresis against realloc thrashing under
    /// alternating insert/evict load.
    pub(crate) fn compact(&mut self) {
        self.entries.retain(|e| !e.is_condemned());
        if self.entries.len() <= self.entries.capacity() / 2 {
            self.entries.shrink_to_fit();
        }
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("len", &self.entries.len())
            .field("capacity", &self.entries.capacity())
            .finish()
    }
}
