#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ```rust
//! use smartcache::{SmartCache, SmartCacheConfig};
//!
//! let cache = SmartCache::init(
//!     SmartCacheConfig { capacity_bytes: 4096 },
//!     None,
//! );
//!
//! let group = cache.alloc_group_id();
//! cache.put_copy(group, 0, b"HELLO");
//!
//! // Reads copy into caller buffers and report the full stored size
//! let mut buf = [0u8; 3];
//! assert_eq!(cache.get(group, 0, &mut buf), Some(5));
//! assert_eq!(&buf, b"HEL");
//!
//! // Two-destination reads split the payload back-to-back
//! let (mut first, mut rest) = ([0u8; 3], [0u8; 10]);
//! cache.get2(group, 0, &mut first, &mut rest);
//! assert_eq!(&first, b"HEL");
//! assert_eq!(&rest[..2], b"LO");
//!
//! // Bulk invalidation by group
//! cache.clear_group(group);
//! cache.release_group_id(group);
//! ```
//!
//! ## Modules
//!
//! - [`config`]: cache configuration
//! - [`metrics`]: hit/miss/eviction counters and the reporting trait

/// Two-level `(group, index)` record key.
mod key;

/// Cache entry: key, owned payload, size, recency-list node pointer.
mod entry;

/// Intrusive doubly linked recency list.
///
/// Internal infrastructure built on raw pointers; not exposed to library
/// consumers. Use the [`SmartCache`] facade instead.
mod list;

/// Sorted record store with binary search, per-group range lookup, and
/// single-pass compaction.
mod store;

/// Group identifier allocation.
mod group;

/// Cache configuration structures.
pub mod config;

/// Cache metrics system.
pub mod metrics;

/// Cache core and the mutex-guarded facade.
mod cache;

/// Physical memory query for cache sizing.
mod sysmem;

pub use cache::{ReleaseHook, SmartCache};
pub use config::SmartCacheConfig;
pub use key::RecordId;
pub use metrics::{CacheMetrics, CoreCacheMetrics};
pub use sysmem::query_system_memory;
