//! Correctness tests for the smart cache.
//!
//! Validates the cache's observable contract through the public facade:
//! byte accounting, LRU eviction order, group invalidation, and the
//! buffer-splitting read variants. Small deterministic capacities so each
//! test can state exactly which keys survive.

use smartcache::{SmartCache, SmartCacheConfig};

/// Helper to create a cache with the given byte capacity.
fn make_cache(capacity_bytes: usize) -> SmartCache {
    SmartCache::init(SmartCacheConfig { capacity_bytes }, None)
}

/// `free + resident bytes == capacity` must hold after every operation.
/// Resident bytes are recomputed from what the cache will still serve.
fn resident_bytes(cache: &SmartCache, keys: &[(u32, u32)]) -> usize {
    let mut total = 0;
    for &(g, i) in keys {
        if let Some(size) = cache.get(g, i, &mut []) {
            total += size;
        }
    }
    total
}

// ============================================================================
// BASIC CONTRACT
// ============================================================================

#[test]
fn test_new_cache_is_empty_with_zero_capacity() {
    let cache = SmartCache::new();
    assert_eq!(cache.capacity(), 0);
    assert_eq!(cache.free(), 0);
    assert!(cache.is_empty());
}

#[test]
fn test_roundtrip_byte_exact() {
    let cache = make_cache(4096);
    let data: Vec<u8> = (0..=255).collect();
    cache.put_copy(3, 9, &data);

    let mut buf = vec![0u8; 256];
    assert_eq!(cache.get(3, 9, &mut buf), Some(256));
    assert_eq!(buf, data);
}

#[test]
fn test_put_transfer_and_put_copy_agree() {
    let cache = make_cache(4096);
    cache.put(1, 0, b"owned".to_vec().into_boxed_slice());
    cache.put_copy(1, 1, b"copied");

    let mut buf = [0u8; 8];
    assert_eq!(cache.get(1, 0, &mut buf), Some(5));
    assert_eq!(&buf[..5], b"owned");
    assert_eq!(cache.get(1, 1, &mut buf), Some(6));
    assert_eq!(&buf[..6], b"copied");
}

#[test]
fn test_get_missing_key_returns_none() {
    let cache = make_cache(1024);
    cache.put_copy(1, 1, b"x");
    let mut buf = [0u8; 4];
    assert_eq!(cache.get(1, 2, &mut buf), None);
    assert_eq!(cache.get(2, 1, &mut buf), None);
}

#[test]
fn test_oversize_put_changes_nothing() {
    let cache = make_cache(100);
    cache.put_copy(1, 0, b"resident");
    let free_before = cache.free();

    cache.put(9, 9, vec![0u8; 101].into_boxed_slice());

    assert_eq!(cache.free(), free_before);
    assert_eq!(cache.len(), 1);
    let mut buf = [0u8; 8];
    assert_eq!(cache.get(9, 9, &mut buf), None);
    assert_eq!(cache.get(1, 0, &mut buf), Some(8));
}

#[test]
fn test_free_plus_resident_equals_capacity() {
    let cache = make_cache(1000);
    let keys: Vec<(u32, u32)> = (0..20).map(|i| (1 + i % 3, i)).collect();
    for &(g, i) in &keys {
        cache.put_copy(g, i, &vec![0u8; 10 + i as usize]);
    }
    assert_eq!(cache.free() + resident_bytes(&cache, &keys), 1000);

    cache.clear_group(2);
    assert_eq!(cache.free() + resident_bytes(&cache, &keys), 1000);
}

// ============================================================================
// EVICTION
// ============================================================================

#[test]
fn test_lru_eviction_never_takes_recently_touched() {
    // 50 1-byte entries fill the cache; touching half protects them
    let cache = make_cache(50);
    for i in 0..50 {
        cache.put_copy(1, i, &[0]);
    }
    let mut buf = [0u8; 1];
    for i in 25..50 {
        assert_eq!(cache.get(1, i, &mut buf), Some(1));
    }
    // Touch the untouched half's oldest too, in reverse, so the recency
    // order is fully known: victims are 1..=10 after this
    assert_eq!(cache.get(1, 0, &mut buf), Some(1));

    cache.put_copy(2, 0, &[0]); // reclaims 10 bytes

    assert_eq!(cache.get(1, 0, &mut buf), Some(1));
    for i in 1..=10 {
        assert_eq!(cache.get(1, i, &mut buf), None, "index {i} should be evicted");
    }
    for i in 25..50 {
        assert_eq!(cache.get(1, i, &mut buf), Some(1));
    }
}

#[test]
fn test_eviction_is_size_blind() {
    // A large cold entry is evicted before small hot ones
    let cache = make_cache(100);
    cache.put_copy(1, 0, &vec![0u8; 60]); // oldest, large
    for i in 1..=4 {
        cache.put_copy(1, i, &[0u8; 10]);
    }
    let mut buf = [0u8; 1];
    for i in 1..=4 {
        cache.get(1, i, &mut buf);
    }

    // Needs 1 byte, reclaims 10 from the tail; the 60-byte entry covers it
    cache.put_copy(2, 0, &[0u8; 1]);

    assert_eq!(cache.get(1, 0, &mut buf), None);
    for i in 1..=4 {
        assert!(cache.get(1, i, &mut buf).is_some());
    }
}

#[test]
fn test_overwrite_refreshes_recency() {
    // 300 resident bytes plus 10 free, so overwrites never trigger reclaim
    let cache = make_cache(310);
    for i in 0..300 {
        cache.put_copy(1, i, &[0u8]);
    }
    // Overwriting the oldest entry promotes it to the head
    cache.put_copy(1, 0, &[1u8]);
    for i in 0..10 {
        cache.put_copy(2, i, &[0u8]); // consumes the remaining free bytes
    }

    // This insert reclaims 10 bytes; victims are now indices 1..=10
    cache.put_copy(2, 100, &[0u8]);

    let mut buf = [0u8; 1];
    assert_eq!(cache.get(1, 1, &mut buf), None);
    assert_eq!(cache.get(1, 10, &mut buf), None);
    assert_eq!(cache.get(1, 11, &mut buf), Some(1));
    assert_eq!(cache.get(1, 0, &mut buf), Some(1));
    assert_eq!(buf, [1u8]);
}

// ============================================================================
// RESIZE
// ============================================================================

#[test]
fn test_resize_always_flushes() {
    let cache = make_cache(1000);
    for i in 0..10 {
        cache.put_copy(1, i, &[0u8; 50]);
    }
    assert!(!cache.is_empty());

    // Growing is just as destructive as shrinking
    cache.set_capacity(2000);
    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 2000);
    assert_eq!(cache.free(), 2000);

    cache.set_capacity(10);
    assert_eq!(cache.free(), 10);
}

// ============================================================================
// GROUP OPERATIONS
// ============================================================================

#[test]
fn test_clean_is_idempotent() {
    let cache = make_cache(1000);
    cache.put_copy(1, 0, b"aaa");
    cache.put_copy(2, 0, b"bbbb");

    cache.clear_group(1);
    let free_after_first = cache.free();
    cache.clear_group(1);

    assert_eq!(cache.free(), free_after_first);
    let mut buf = [0u8; 4];
    assert_eq!(cache.get(2, 0, &mut buf), Some(4));
    assert_eq!(&buf, b"bbbb");
}

#[test]
fn test_clean_empty_group_is_noop() {
    let cache = make_cache(100);
    cache.put_copy(1, 0, b"x");
    let free_before = cache.free();
    cache.clear_group(42);
    assert_eq!(cache.free(), free_before);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_clear_group_if_keeps_nonmatching() {
    let cache = make_cache(1000);
    for i in 0..6u32 {
        cache.put_copy(5, i, &[i as u8; 4]);
    }
    // Drop the even-valued payloads only
    cache.clear_group_if(5, |bytes| bytes[0] % 2 == 0);

    let mut buf = [0u8; 4];
    for i in 0..6u32 {
        let hit = cache.get(5, i, &mut buf).is_some();
        assert_eq!(hit, i % 2 == 1, "index {i}");
    }
}

#[test]
fn test_modify_preserves_sizes_and_accounting() {
    let cache = make_cache(1000);
    cache.put_copy(3, 0, b"abcdef");
    cache.put_copy(3, 1, b"ghij");
    let free_before = cache.free();

    cache.for_each_in_group(3, |bytes| {
        bytes.make_ascii_uppercase();
    });

    assert_eq!(cache.free(), free_before);
    let mut buf = [0u8; 8];
    assert_eq!(cache.get(3, 0, &mut buf), Some(6));
    assert_eq!(&buf[..6], b"ABCDEF");
    assert_eq!(cache.get(3, 1, &mut buf), Some(4));
    assert_eq!(&buf[..4], b"GHIJ");
}

// ============================================================================
// SPEC SCENARIOS
// ============================================================================

/// Scenario A: mass insert far beyond capacity; the survivors are exactly
/// a recency window near the end of the insert order.
#[test]
fn test_scenario_mass_insert_keeps_recent_window() {
    const CAPACITY: usize = 100_000;
    const ENTRY_SIZE: usize = 1024;
    const INSERTS: u32 = 100_000;

    let cache = make_cache(CAPACITY);
    let payload = vec![0u8; ENTRY_SIZE];
    for i in 0..INSERTS {
        // Spread across several groups
        cache.put_copy(i % 7, i, &payload);
    }

    let window = (CAPACITY / ENTRY_SIZE) as u32 - 10; // 87 most recent
    let mut buf = [0u8; 1];
    for i in (INSERTS - window)..INSERTS {
        assert!(
            cache.get(i % 7, i, &mut buf).is_some(),
            "recent insert {i} was evicted"
        );
    }
    // Keys inserted much earlier are long gone
    for i in 0..1000 {
        assert!(cache.get(i % 7, i, &mut buf).is_none());
    }
}

/// Scenario B: interleaved two-group insert, then clean one group.
#[test]
fn test_scenario_clean_one_group_leaves_the_other() {
    let cache = make_cache(1000);
    let g1 = cache.alloc_group_id();
    let g2 = cache.alloc_group_id();

    cache.put_copy(g1, 0, b"one");
    cache.put_copy(g2, 0, b"four");
    cache.put_copy(g1, 1, b"two");
    cache.put_copy(g2, 1, b"five!");
    cache.put_copy(g1, 2, b"three");

    let free_before = cache.free();
    cache.clear_group(g1);
    assert_eq!(cache.free(), free_before + 3 + 3 + 5);

    let mut buf = [0u8; 8];
    for i in 0..3 {
        assert_eq!(cache.get(g1, i, &mut buf), None);
    }
    assert_eq!(cache.get(g2, 0, &mut buf), Some(4));
    assert_eq!(&buf[..4], b"four");
    assert_eq!(cache.get(g2, 1, &mut buf), Some(5));
    assert_eq!(&buf[..5], b"five!");
}

/// Scenario C: overwrite accounting, "ABCD" replaced by "XY".
#[test]
fn test_scenario_overwrite_accounting() {
    let cache = make_cache(100);
    cache.put_copy(1, 1, b"ABCD");
    let free_after_first = cache.free();

    cache.put_copy(1, 1, b"XY");
    assert_eq!(cache.free(), free_after_first + (4 - 2));

    let mut buf = [0u8; 8];
    assert_eq!(cache.get(1, 1, &mut buf), Some(2));
    assert_eq!(&buf[..2], b"XY");
    // Old bytes are unrecoverable
    assert_ne!(&buf[..2], b"AB");
    assert_eq!(cache.len(), 1);
}

/// Scenario D: get2 splits "HELLO" across a 3-byte and a 10-byte buffer.
#[test]
fn test_scenario_get2_splits_payload() {
    let cache = make_cache(100);
    cache.put_copy(2, 2, b"HELLO");

    let mut buf1 = [0u8; 3];
    let mut buf2 = [0u8; 10];
    assert_eq!(cache.get2(2, 2, &mut buf1, &mut buf2), Some(5));
    assert_eq!(&buf1, b"HEL");
    assert_eq!(&buf2[..2], b"LO");
}

#[test]
fn test_get2_small_payload_never_touches_second_buffer() {
    let cache = make_cache(100);
    cache.put_copy(2, 2, b"HI");

    let mut buf1 = [0u8; 3];
    let mut buf2 = [0xAAu8; 4];
    assert_eq!(cache.get2(2, 2, &mut buf1, &mut buf2), Some(2));
    assert_eq!(&buf1[..2], b"HI");
    assert_eq!(buf2, [0xAAu8; 4]);
}

#[test]
fn test_get2_second_buffer_caps_the_remainder() {
    let cache = make_cache(100);
    cache.put_copy(2, 2, b"ABCDEFGH");

    let mut buf1 = [0u8; 3];
    let mut buf2 = [0u8; 2];
    assert_eq!(cache.get2(2, 2, &mut buf1, &mut buf2), Some(8));
    assert_eq!(&buf1, b"ABC");
    assert_eq!(&buf2, b"DE");
}
