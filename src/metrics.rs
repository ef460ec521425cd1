//! Cache metrics.
//!
//! Counter-based metrics reported as a `BTreeMap` so keys always come out
//! in the same order — important for reproducible test output and stable
//! serialization. The O(log n) lookup cost is irrelevant at ~a dozen keys.

use std::collections::BTreeMap;

/// Counters tracked by the cache.
///
/// Byte counters follow payload bytes, not per-entry overhead.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of get requests made to the cache.
    pub requests: u64,

    /// Requests that found their key.
    pub cache_hits: u64,

    /// Total payload bytes requested (hits and misses).
    pub total_bytes_requested: u64,

    /// Payload bytes served from cache (hits only).
    pub bytes_served_from_cache: u64,

    /// Payload bytes written into the cache.
    pub bytes_written_to_cache: u64,

    /// Entries removed by eviction or group invalidation.
    pub evictions: u64,

    /// Current payload bytes resident in the cache.
    pub cache_size_bytes: u64,

    /// Configured capacity in bytes.
    pub max_cache_size_bytes: u64,
}

impl CoreCacheMetrics {
    /// Creates counters for a cache with the given byte capacity.
    pub fn new(max_cache_size_bytes: u64) -> Self {
        Self {
            max_cache_size_bytes,
            ..Default::default()
        }
    }

    /// Records a get that found its key and served `object_size` bytes.
    pub fn record_hit(&mut self, object_size: u64) {
        self.requests += 1;
        self.cache_hits += 1;
        self.total_bytes_requested += object_size;
        self.bytes_served_from_cache += object_size;
    }

    /// Records a get that missed. Misses derive as `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records removal of a resident entry of `evicted_size` bytes.
    pub fn record_eviction(&mut self, evicted_size: u64) {
        self.evictions += 1;
        self.cache_size_bytes -= evicted_size;
    }

    /// Records insertion of a new entry of `object_size` bytes.
    pub fn record_insertion(&mut self, object_size: u64) {
        self.cache_size_bytes += object_size;
        self.bytes_written_to_cache += object_size;
    }

    /// Records an in-place overwrite that replaced `old_size` bytes with
    /// `new_size` bytes.
    pub fn record_overwrite(&mut self, old_size: u64, new_size: u64) {
        self.cache_size_bytes = self.cache_size_bytes - old_size + new_size;
        self.bytes_written_to_cache += new_size;
    }

    /// Hit rate in `[0.0, 1.0]`; 0.0 before any request.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Resident bytes relative to capacity, in `[0.0, 1.0]`.
    pub fn cache_utilization(&self) -> f64 {
        if self.max_cache_size_bytes > 0 {
            self.cache_size_bytes as f64 / self.max_cache_size_bytes as f64
        } else {
            0.0
        }
    }

    /// All counters and derived rates, keyed for deterministic ordering.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert(
            "cache_misses".to_string(),
            (self.requests - self.cache_hits) as f64,
        );
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("cache_utilization".to_string(), self.cache_utilization());

        metrics.insert(
            "bytes_served_from_cache".to_string(),
            self.bytes_served_from_cache as f64,
        );
        metrics.insert(
            "bytes_written_to_cache".to_string(),
            self.bytes_written_to_cache as f64,
        );
        metrics.insert(
            "total_bytes_requested".to_string(),
            self.total_bytes_requested as f64,
        );
        metrics.insert("cache_size_bytes".to_string(), self.cache_size_bytes as f64);
        metrics.insert(
            "max_cache_size_bytes".to_string(),
            self.max_cache_size_bytes as f64,
        );

        metrics
    }
}

/// Uniform metrics-reporting interface.
///
/// Keys are sorted alphabetically so repeated reports diff cleanly.
pub trait CacheMetrics {
    /// All metrics as name/value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Eviction policy name, for labeling reports.
    fn algorithm_name(&self) -> &'static str;
}
