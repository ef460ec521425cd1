//! Cache entry type.
//!
//! One `CacheEntry` per cached payload: the `(group, index)` key, the owned
//! payload bytes, the byte size, and a raw pointer to the entry's node in
//! the recency list. Entries live in the sorted record store and move when
//! it compacts; the list node is heap-allocated and never moves, so the
//! pointer stays valid across compaction.

use crate::key::RecordId;
use crate::list::AccessNode;
use core::fmt;

/// A single cached record.
///
/// The payload is held as `Option<Box<[u8]>>`: `None` marks a slot that has
/// been condemned by eviction or a group clean and is awaiting the next
/// compaction pass. Condemned slots never survive past the public operation
/// that created them.
pub(crate) struct CacheEntry {
    /// The entry's `(group, index)` key. Determines its position in the store.
    pub(crate) key: RecordId,
    /// Owned payload bytes; `None` once the slot is condemned.
    pub(crate) payload: Option<Box<[u8]>>,
    /// Payload size in bytes, kept even while condemned for byte accounting.
    pub(crate) size: usize,
    /// The entry's node in the recency list. Null once condemned.
    pub(crate) node: *mut AccessNode,
}

impl CacheEntry {
    /// Creates a live entry owning `payload`, linked to `node`.
    #[inline]
    pub(crate) fn new(key: RecordId, payload: Box<[u8]>, node: *mut AccessNode) -> Self {
        let size = payload.len();
        Self {
            key,
            payload: Some(payload),
            size,
            node,
        }
    }

    /// True once the payload has been released and the slot awaits compaction.
    #[inline]
    pub(crate) fn is_condemned(&self) -> bool {
        self.payload.is_none()
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("size", &self.size)
            .field("condemned", &self.is_condemned())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr;

    #[test]
    fn test_new_entry_is_live() {
        let entry = CacheEntry::new(
            RecordId::new(1, 2),
            vec![0u8; 16].into_boxed_slice(),
            ptr::null_mut(),
        );
        assert_eq!(entry.size, 16);
        assert!(!entry.is_condemned());
    }

    #[test]
    fn test_condemned_keeps_size() {
        let mut entry = CacheEntry::new(
            RecordId::new(1, 2),
            vec![0u8; 8].into_boxed_slice(),
            ptr::null_mut(),
        );
        let _payload = entry.payload.take();
        assert!(entry.is_condemned());
        assert_eq!(entry.size, 8);
    }
}
