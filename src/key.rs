//! Two-level record key.
//!
//! Every cached payload is addressed by a `(group, index)` pair. The group
//! is a caller-defined namespace used for bulk invalidation; the index is
//! unique within its group. Keys are totally ordered group-major, which is
//! what keeps each group's entries contiguous in the record store.

use core::fmt;

/// Key of one cached record: `(group, index)`, ordered by group then index.
///
/// The derived `Ord` compares fields in declaration order, so the group is
/// the major key. `RecordId` is `Copy` and is duplicated into the recency
/// list node of each live entry.
///
/// # Examples
///
/// ```
/// use smartcache::RecordId;
///
/// let a = RecordId::new(1, 9);
/// let b = RecordId::new(2, 0);
/// assert!(a < b); // group dominates index
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RecordId {
    /// Caller-defined namespace of related entries.
    pub group: u32,
    /// Position within the group, unique per group.
    pub index: u32,
}

impl RecordId {
    /// Creates a key from its two components.
    #[inline]
    pub const fn new(group: u32, index: u32) -> Self {
        Self { group, index }
    }

    /// Smallest possible key of `group`, used as a range probe.
    #[inline]
    pub(crate) const fn group_min(group: u32) -> Self {
        Self { group, index: 0 }
    }

    /// Largest possible key of `group`, used as a range probe.
    #[inline]
    pub(crate) const fn group_max(group: u32) -> Self {
        Self {
            group,
            index: u32::MAX,
        }
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.group, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_major_ordering() {
        assert!(RecordId::new(1, u32::MAX) < RecordId::new(2, 0));
        assert!(RecordId::new(3, 1) < RecordId::new(3, 2));
        assert_eq!(RecordId::new(7, 7), RecordId::new(7, 7));
    }

    #[test]
    fn test_group_probes_bracket_the_group() {
        let g = 42;
        assert!(RecordId::group_min(g) <= RecordId::new(g, 0));
        assert!(RecordId::group_max(g) >= RecordId::new(g, u32::MAX));
        assert!(RecordId::group_max(g - 1) < RecordId::group_min(g));
    }
}
