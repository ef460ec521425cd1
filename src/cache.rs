//! Cache core and facade.
//!
//! All algorithm logic lives in [`CacheCore`], which owns the sorted record
//! store, the recency list, the group-id allocator, and the byte counters,
//! and is not synchronized itself. The public [`SmartCache`] facade wraps
//! the core in a single `parking_lot::Mutex`; every public operation holds
//! the lock for its full duration, so the whole structure moves atomically
//! from one consistent state to the next.
//!
//! # Byte accounting
//!
//! `free + Σ(entry.size) == capacity` holds after every operation. Inserts
//! debit `free`, eviction and invalidation credit it, and a destructive
//! resize resets it to the new capacity.
//!
//! # Eviction
//!
//! When an insert does not fit, [`CacheCore::reclaim`] walks the recency
//! list from the tail (oldest first), releasing payloads until the target
//! is met or the list is empty, then sweeps the condemned slots out of the
//! store in a single compaction pass. The target is over-requested by
//! [`FREE_K`] so inserts near the capacity boundary do not each pay their
//! own eviction pass.

use crate::config::SmartCacheConfig;
use crate::entry::CacheEntry;
use crate::group::GroupIdAllocator;
use crate::key::RecordId;
use crate::list::AccessList;
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::store::RecordStore;
use core::ptr;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Eviction amortization factor: reclaim requests ten times the bytes the
/// blocked insert needs, so eviction passes recur rarely under sustained
/// insert load at the capacity boundary.
const FREE_K: usize = 10;

/// Hook invoked for every payload the cache releases.
///
/// Configured once at construction and used for the cache's whole
/// lifetime: evictions, overwrites, group invalidation, oversize
/// rejections, and destruction of a non-empty cache all route the payload
/// through it. `None` at construction means ordinary drop, i.e. the
/// platform heap free.
pub type ReleaseHook = Box<dyn FnMut(Box<[u8]>) + Send>;

/// The unsynchronized cache state. All invariants are maintained here;
/// [`SmartCache`] only adds the lock.
pub(crate) struct CacheCore {
    store: RecordStore,
    list: AccessList,
    groups: GroupIdAllocator,
    capacity: usize,
    free: usize,
    release: Option<ReleaseHook>,
    metrics: CoreCacheMetrics,
}

// SAFETY: CacheCore owns all of its data; the raw pointers in store entries
// point only to nodes owned by `list`, which lives and dies with the core.
// Concurrent access is mediated by the facade's mutex.
unsafe impl Send for CacheCore {}

// SAFETY: all mutation requires &mut self; shared references expose nothing
// that can race.
unsafe impl Sync for CacheCore {}

impl CacheCore {
    fn new(capacity: usize, release: Option<ReleaseHook>) -> Self {
        Self {
            store: RecordStore::new(),
            list: AccessList::new(),
            groups: GroupIdAllocator::new(),
            capacity,
            free: capacity,
            release,
            metrics: CoreCacheMetrics::new(capacity as u64),
        }
    }

    /// Routes a payload the cache is done with through the release hook.
    fn release_payload(&mut self, payload: Box<[u8]>) {
        match &mut self.release {
            Some(hook) => hook(payload),
            None => drop(payload),
        }
    }

    /// Evicts from the recency tail until `target` bytes are freed or the
    /// cache is empty, then compacts the store once. Returns bytes freed.
    fn reclaim(&mut self, target: usize) -> usize {
        let mut freed = 0usize;
        let mut condemned = false;
        while freed < target {
            let Some(key) = self.list.pop_back() else { break };
            let Ok(pos) = self.store.find(key) else {
                debug_assert!(false, "recency node for missing entry {key:?}");
                continue;
            };
            let entry = self.store.entry_mut(pos);
            let size = entry.size;
            let payload = entry.payload.take();
            entry.node = ptr::null_mut();
            self.free += size;
            freed += size;
            condemned = true;
            self.metrics.record_eviction(size as u64);
            if let Some(payload) = payload {
                self.release_payload(payload);
            }
        }
        if condemned {
            self.store.compact();
        }
        debug_assert_eq!(self.list.len(), self.store.len());
        freed
    }

    /// Destructive resize: flush the whole cache, then adopt `bytes`.
    fn set_capacity(&mut self, bytes: usize) {
        self.reclaim(usize::MAX);
        debug_assert_eq!(self.free, self.capacity);
        debug_assert!(self.store.is_empty());
        debug_assert!(self.list.is_empty());
        self.capacity = bytes;
        self.free = bytes;
        self.metrics.max_cache_size_bytes = bytes as u64;
    }

    fn put(&mut self, key: RecordId, payload: Box<[u8]>) {
        let len = payload.len();
        if len > self.capacity {
            // Larger than the whole cache: consume the payload, keep nothing.
            self.release_payload(payload);
            return;
        }
        if self.free < len {
            self.reclaim(len.saturating_mul(FREE_K));
            debug_assert!(self.free >= len || self.store.is_empty());
        }
        match self.store.find(key) {
            Ok(pos) => {
                let entry = self.store.entry_mut(pos);
                let old_size = entry.size;
                let old_payload = entry.payload.replace(payload);
                entry.size = len;
                let node = entry.node;
                self.free += old_size;
                self.free -= len;
                // SAFETY: node belongs to this live entry
                unsafe { self.list.move_to_front(node) };
                self.metrics.record_overwrite(old_size as u64, len as u64);
                if let Some(old) = old_payload {
                    self.release_payload(old);
                }
            }
            Err(pos) => {
                let node = self.list.push_front(key);
                self.store.insert(pos, CacheEntry::new(key, payload, node));
                self.free -= len;
                self.metrics.record_insertion(len as u64);
            }
        }
    }

    fn get(&mut self, key: RecordId, buf: &mut [u8]) -> Option<usize> {
        let Ok(pos) = self.store.find(key) else {
            self.metrics.record_miss();
            return None;
        };
        let entry = self.store.entry_mut(pos);
        let size = entry.size;
        if let Some(payload) = entry.payload.as_deref() {
            let n = size.min(buf.len());
            buf[..n].copy_from_slice(&payload[..n]);
        }
        let node = entry.node;
        // SAFETY: node belongs to this live entry
        unsafe { self.list.move_to_front(node) };
        self.metrics.record_hit(size as u64);
        Some(size)
    }

    fn get2(&mut self, key: RecordId, buf1: &mut [u8], buf2: &mut [u8]) -> Option<usize> {
        let Ok(pos) = self.store.find(key) else {
            self.metrics.record_miss();
            return None;
        };
        let entry = self.store.entry_mut(pos);
        let size = entry.size;
        if let Some(payload) = entry.payload.as_deref() {
            let n1 = size.min(buf1.len());
            buf1[..n1].copy_from_slice(&payload[..n1]);
            // Only spill into buf2 once buf1 is exhausted
            if size > buf1.len() {
                let n2 = (size - buf1.len()).min(buf2.len());
                buf2[..n2].copy_from_slice(&payload[buf1.len()..buf1.len() + n2]);
            }
        }
        let node = entry.node;
        // SAFETY: node belongs to this live entry
        unsafe { self.list.move_to_front(node) };
        self.metrics.record_hit(size as u64);
        Some(size)
    }

    fn for_each_in_group_if<P, F>(&mut self, group: u32, mut predicate: P, mut mutator: F)
    where
        P: FnMut(&[u8]) -> bool,
        F: FnMut(&mut [u8]),
    {
        let Some(range) = self.store.range_for_group(group) else {
            return;
        };
        for entry in self.store.slice_mut(range) {
            if let Some(payload) = entry.payload.as_deref_mut() {
                if predicate(payload) {
                    mutator(payload);
                }
            }
        }
    }

    fn clear_group_if<P>(&mut self, group: u32, mut predicate: P)
    where
        P: FnMut(&[u8]) -> bool,
    {
        let Some(range) = self.store.range_for_group(group) else {
            return;
        };
        let mut freed = 0usize;
        let mut condemned = false;
        for entry in self.store.slice_mut(range) {
            let matched = match entry.payload.as_deref() {
                Some(bytes) => predicate(bytes),
                None => false,
            };
            if !matched {
                continue;
            }
            let payload = entry.payload.take();
            let node = entry.node;
            entry.node = ptr::null_mut();
            freed += entry.size;
            condemned = true;
            self.metrics.record_eviction(entry.size as u64);
            // SAFETY: node belonged to this live entry and is unlinked
            // exactly once
            unsafe { self.list.unlink(node) };
            if let Some(payload) = payload {
                match &mut self.release {
                    Some(hook) => hook(payload),
                    None => drop(payload),
                }
            }
        }
        self.free += freed;
        if condemned {
            self.store.compact();
        }
        debug_assert_eq!(self.list.len(), self.store.len());
    }
}

impl Drop for CacheCore {
    /// Evicts and releases every remaining payload through the configured
    /// hook before the storage itself is freed.
    fn drop(&mut self) {
        self.reclaim(usize::MAX);
    }
}

impl core::fmt::Debug for CacheCore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CacheCore")
            .field("capacity", &self.capacity)
            .field("free", &self.free)
            .field("len", &self.store.len())
            .finish()
    }
}

/// A bounded in-process binary-object cache with `(group, index)` keys,
/// LRU eviction, and bulk group invalidation.
///
/// All methods take `&self`; the cache is `Send + Sync` and shareable via
/// `Arc`. A single internal mutex guards the whole structure, so reads
/// serialize against each other as well as against writes, and lock hold
/// time on `get` scales with the requested copy length.
///
/// # Examples
///
/// ```
/// use smartcache::{SmartCache, SmartCacheConfig};
///
/// let cache = SmartCache::init(SmartCacheConfig { capacity_bytes: 1024 }, None);
/// let group = cache.alloc_group_id();
///
/// cache.put_copy(group, 7, b"payload");
///
/// let mut buf = [0u8; 16];
/// assert_eq!(cache.get(group, 7, &mut buf), Some(7));
/// assert_eq!(&buf[..7], b"payload");
///
/// cache.clear_group(group);
/// assert_eq!(cache.get(group, 7, &mut buf), None);
/// ```
pub struct SmartCache {
    core: Mutex<CacheCore>,
}

impl SmartCache {
    /// Creates an empty cache with capacity 0 and the default release hook.
    ///
    /// Every `put` against a zero-capacity cache is an oversize rejection;
    /// call [`SmartCache::set_capacity`] to make it useful.
    pub fn new() -> Self {
        Self::init(SmartCacheConfig { capacity_bytes: 0 }, None)
    }

    /// Creates a cache from `config`, with an optional payload release
    /// hook. `None` means released payloads are simply dropped.
    pub fn init(config: SmartCacheConfig, release: Option<ReleaseHook>) -> Self {
        Self {
            core: Mutex::new(CacheCore::new(config.capacity_bytes, release)),
        }
    }

    /// Destructively resizes the cache: evicts everything, then adopts
    /// `bytes` as both the capacity and the free count. Never an
    /// incremental fit.
    pub fn set_capacity(&self, bytes: usize) {
        self.core.lock().set_capacity(bytes);
    }

    /// Total payload budget in bytes.
    pub fn capacity(&self) -> usize {
        self.core.lock().capacity
    }

    /// Bytes currently unused. `free() + resident payload bytes` always
    /// equals [`SmartCache::capacity`].
    pub fn free(&self) -> usize {
        self.core.lock().free
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.core.lock().store.len()
    }

    /// True if no entries are cached.
    pub fn is_empty(&self) -> bool {
        self.core.lock().store.is_empty()
    }

    /// Issues a fresh group id, unique among currently registered ids.
    pub fn alloc_group_id(&self) -> u32 {
        self.core.lock().groups.alloc()
    }

    /// Retires a group id. Advisory only: entries cached under `id` are
    /// not removed — use [`SmartCache::clear_group`] for that.
    pub fn release_group_id(&self, id: u32) {
        self.core.lock().groups.release(id);
    }

    /// Inserts `payload` under `(group, index)`, taking ownership.
    ///
    /// A payload larger than the whole cache is silently rejected (it is
    /// still consumed and released, never leaked). An existing entry under
    /// the same key has its payload replaced and its recency refreshed.
    /// If the payload does not fit in the free space, least recently used
    /// entries are evicted first.
    pub fn put(&self, group: u32, index: u32, payload: Box<[u8]>) {
        self.core.lock().put(RecordId::new(group, index), payload);
    }

    /// Like [`SmartCache::put`], but copies from a borrowed buffer; the
    /// caller keeps ownership of `bytes`.
    pub fn put_copy(&self, group: u32, index: u32, bytes: &[u8]) {
        self.put(group, index, bytes.to_vec().into_boxed_slice());
    }

    /// Looks up `(group, index)`; on a hit, copies up to `buf.len()` bytes
    /// of the payload into `buf`, refreshes the entry's recency, and
    /// returns the full stored size (which may exceed what was copied).
    pub fn get(&self, group: u32, index: u32, buf: &mut [u8]) -> Option<usize> {
        self.core.lock().get(RecordId::new(group, index), buf)
    }

    /// Two-buffer variant of [`SmartCache::get`]: the first `buf1.len()`
    /// bytes go to `buf1`; only if the payload is larger does the
    /// remainder (capped by `buf2.len()`) continue into `buf2`.
    pub fn get2(
        &self,
        group: u32,
        index: u32,
        buf1: &mut [u8],
        buf2: &mut [u8],
    ) -> Option<usize> {
        self.core.lock().get2(RecordId::new(group, index), buf1, buf2)
    }

    /// Edits every payload in `group` in place. The mutator may rewrite
    /// bytes but cannot resize or remove entries, so byte accounting is
    /// untouched. A group with no entries is a no-op.
    pub fn for_each_in_group<F>(&self, group: u32, mutator: F)
    where
        F: FnMut(&mut [u8]),
    {
        self.core
            .lock()
            .for_each_in_group_if(group, |_: &[u8]| true, mutator);
    }

    /// Like [`SmartCache::for_each_in_group`], editing only payloads the
    /// predicate accepts.
    pub fn for_each_in_group_if<P, F>(&self, group: u32, predicate: P, mutator: F)
    where
        P: FnMut(&[u8]) -> bool,
        F: FnMut(&mut [u8]),
    {
        self.core.lock().for_each_in_group_if(group, predicate, mutator);
    }

    /// Removes every entry of `group`, releasing payloads and crediting
    /// their bytes back to the free count. Idempotent; a group with no
    /// entries is a no-op.
    pub fn clear_group(&self, group: u32) {
        self.core.lock().clear_group_if(group, |_| true);
    }

    /// Like [`SmartCache::clear_group`], removing only entries whose
    /// payload the predicate accepts. One compaction pass regardless of
    /// how many entries matched.
    pub fn clear_group_if<P>(&self, group: u32, predicate: P)
    where
        P: FnMut(&[u8]) -> bool,
    {
        self.core.lock().clear_group_if(group, predicate);
    }
}

impl Default for SmartCache {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SmartCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let core = self.core.lock();
        f.debug_struct("SmartCache")
            .field("capacity", &core.capacity)
            .field("free", &core.free)
            .field("len", &core.store.len())
            .finish()
    }
}

impl CacheMetrics for SmartCache {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.core.lock().metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}
