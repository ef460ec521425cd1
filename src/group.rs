//! Group identifier allocation.
//!
//! Groups are caller-owned 32-bit handles used to namespace cache entries.
//! The allocator only tracks which ids are handed out; it never touches the
//! record store. Releasing an id does not delete the group's entries —
//! callers that want the bytes back must `clear_group` first.

use hashbrown::HashSet;

/// Issues and retires unique 32-bit group identifiers.
///
/// `alloc` starts from a random id and probes linearly past collisions, so
/// ids are unpredictable but allocation stays O(1) in practice even with
/// many registered groups.
#[derive(Debug, Default)]
pub(crate) struct GroupIdAllocator {
    registered: HashSet<u32>,
}

impl GroupIdAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id, registered until [`GroupIdAllocator::release`].
    pub(crate) fn alloc(&mut self) -> u32 {
        let mut id: u32 = rand::random();
        while self.registered.contains(&id) {
            id = id.wrapping_add(1);
        }
        self.registered.insert(id);
        id
    }

    /// Retires `id` so it can be issued again. No-op if `id` was never
    /// registered. Purely advisory: entries keyed under `id` stay cached.
    pub(crate) fn release(&mut self, id: u32) {
        self.registered.remove(&id);
    }

    #[cfg(test)]
    pub(crate) fn is_registered(&self, id: u32) -> bool {
        self.registered.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_returns_distinct_ids() {
        let mut alloc = GroupIdAllocator::new();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(alloc.alloc()));
        }
    }

    #[test]
    fn test_release_allows_reuse() {
        let mut alloc = GroupIdAllocator::new();
        let id = alloc.alloc();
        assert!(alloc.is_registered(id));
        alloc.release(id);
        assert!(!alloc.is_registered(id));
    }

    #[test]
    fn test_release_unknown_id_is_noop() {
        let mut alloc = GroupIdAllocator::new();
        alloc.release(12345);
    }
}
