//! Cache configuration.
//!
//! A single plain-field struct; create it directly, no builder.
//!
//! # Sizing
//!
//! The cache is sized in payload bytes, not entries. Per-entry overhead
//! (key, list node, pointers) is roughly 60-70 bytes on top of the payload,
//! so a budget of many small entries costs proportionally more than the
//! configured capacity alone.
//!
//! Callers that size the cache from the machine's physical memory can use
//! [`crate::query_system_memory`]:
//!
//! ```no_run
//! use smartcache::{query_system_memory, SmartCache, SmartCacheConfig};
//!
//! // An eighth of physical RAM, whatever the machine has
//! let config = SmartCacheConfig {
//!     capacity_bytes: (query_system_memory() / 8) as usize,
//! };
//! let cache = SmartCache::init(config, None);
//! ```

use core::fmt;

/// Configuration for a [`SmartCache`](crate::SmartCache).
///
/// # Fields
///
/// - `capacity_bytes`: total payload budget. A capacity of zero is valid
///   and makes every `put` an oversize rejection.
///
/// # Examples
///
/// ```
/// use smartcache::{SmartCache, SmartCacheConfig};
///
/// let config = SmartCacheConfig {
///     capacity_bytes: 16 * 1024 * 1024, // 16MB of payload
/// };
/// let cache = SmartCache::init(config, None);
/// assert_eq!(cache.capacity(), 16 * 1024 * 1024);
/// ```
#[derive(Clone, Copy)]
pub struct SmartCacheConfig {
    /// Maximum total payload size in bytes.
    pub capacity_bytes: usize,
}

impl fmt::Debug for SmartCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartCacheConfig")
            .field("capacity_bytes", &self.capacity_bytes)
            .finish()
    }
}
