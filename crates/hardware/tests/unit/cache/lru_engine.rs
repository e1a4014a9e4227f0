//! LRU Engine Unit Tests.
//!
//! Verifies the access classification of the set-associative cache: hits,
//! fills into free lines, and evictions of the least recently used line.
//! Tests drive `Cache::access` directly with explicit set indices, tags and
//! timestamps; no trace or address decoding is involved.

use csim_core::cache::{AccessOutcome, Cache};
use csim_core::config::CacheConfig;
use csim_core::stats::CacheStats;

use crate::common::harness::stats;

// ──────────────────────────────────────────────────────────
// Helper: build a small test cache
// ──────────────────────────────────────────────────────────

/// 2 sets of 4 ways; block bits do not matter at this level.
fn test_cache() -> Cache {
    Cache::new(&CacheConfig::new(1, 4, 0)).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Construction
// ══════════════════════════════════════════════════════════

#[test]
fn new_cache_is_empty() {
    let cache = test_cache();
    assert_eq!(cache.num_sets(), 2);
    assert_eq!(cache.ways(), 4);
    assert_eq!(cache.valid_lines(), 0);
    for set in cache.sets() {
        assert_eq!(set.ways(), 4);
        assert!(set.lines().iter().all(|l| !l.is_valid() && l.recency() == 0));
    }
}

#[test]
fn new_rejects_zero_ways() {
    assert!(Cache::new(&CacheConfig::new(1, 0, 0)).is_err());
}

// ══════════════════════════════════════════════════════════
// 2. Hit / Fill
// ══════════════════════════════════════════════════════════

/// First touch of a tag fills way 0; the second touch hits and refreshes recency.
#[test]
fn miss_fill_then_hit() {
    let mut cache = test_cache();
    let mut s = CacheStats::default();

    assert_eq!(cache.access(0, 0xAA, 1, &mut s), AccessOutcome::MissFill);
    assert_eq!(cache.access(0, 0xAA, 2, &mut s), AccessOutcome::Hit);
    assert_eq!(s, stats(1, 1, 0));

    let line = cache.set(0).unwrap().lines()[0];
    assert!(line.is_valid());
    assert_eq!(line.tag(), 0xAA);
    assert_eq!(line.recency(), 2);
}

/// Fills go to the lowest free way, in order.
#[test]
fn fills_use_ways_in_index_order() {
    let mut cache = test_cache();
    let mut s = CacheStats::default();

    for (stamp, tag) in (1..).zip([10u64, 20, 30]) {
        assert_eq!(cache.access(1, tag, stamp, &mut s), AccessOutcome::MissFill);
    }
    let tags: Vec<u64> = cache.set(1).unwrap().lines()[..3].iter().map(|l| l.tag()).collect();
    assert_eq!(tags, vec![10, 20, 30]);
    assert!(!cache.set(1).unwrap().lines()[3].is_valid());
    assert_eq!(s, stats(0, 3, 0));
}

/// Sets are independent: the same tag in different sets is two blocks.
#[test]
fn sets_are_independent() {
    let mut cache = test_cache();
    let mut s = CacheStats::default();

    assert_eq!(cache.access(0, 7, 1, &mut s), AccessOutcome::MissFill);
    assert_eq!(cache.access(1, 7, 2, &mut s), AccessOutcome::MissFill);
    assert!(cache.contains(0, 7));
    assert!(cache.contains(1, 7));
    assert!(!cache.contains(0, 8));
    assert!(!cache.contains(5, 7), "out-of-range set is never resident");
}

/// `contains` does not disturb recency.
#[test]
fn contains_is_read_only() {
    let mut cache = test_cache();
    let mut s = CacheStats::default();
    let _ = cache.access(0, 1, 1, &mut s);
    let before = cache.clone();
    assert!(cache.contains(0, 1));
    assert_eq!(cache, before);
}

// ══════════════════════════════════════════════════════════
// 3. Eviction
// ══════════════════════════════════════════════════════════

/// With every way valid, a new tag evicts the line with the oldest stamp.
#[test]
fn evicts_least_recently_used() {
    let mut cache = test_cache();
    let mut s = CacheStats::default();

    for (stamp, tag) in (1..).zip([1u64, 2, 3, 4]) {
        let _ = cache.access(0, tag, stamp, &mut s);
    }
    // Touch tag 1 again: tag 2 (stamp 2) is now the oldest.
    assert_eq!(cache.access(0, 1, 5, &mut s), AccessOutcome::Hit);
    assert_eq!(cache.access(0, 5, 6, &mut s), AccessOutcome::MissEvict);

    assert!(!cache.contains(0, 2));
    assert_eq!(cache.set(0).unwrap().lines()[1].tag(), 5);
    assert_eq!(s, stats(1, 5, 1));
}

/// Repeated hits on the MRU line do not change the victim.
#[test]
fn repeated_hits_keep_victim() {
    let mut cache = test_cache();
    let mut s = CacheStats::default();

    for (stamp, tag) in (1..).zip([1u64, 2, 3, 4]) {
        let _ = cache.access(0, tag, stamp, &mut s);
    }
    let _ = cache.access(0, 4, 5, &mut s);
    let _ = cache.access(0, 4, 6, &mut s);
    assert_eq!(cache.access(0, 9, 7, &mut s), AccessOutcome::MissEvict);
    assert!(!cache.contains(0, 1));
}

/// Equal stamps: the lowest way is evicted.
#[test]
fn tie_evicts_lowest_way() {
    let mut cache = test_cache();
    let mut s = CacheStats::default();

    for tag in [1u64, 2, 3, 4] {
        let _ = cache.access(0, tag, 10, &mut s);
    }
    assert_eq!(cache.access(0, 5, 11, &mut s), AccessOutcome::MissEvict);
    assert_eq!(cache.set(0).unwrap().lines()[0].tag(), 5);

    // Ways 1..3 still tie at stamp 10; way 1 goes next.
    assert_eq!(cache.access(0, 6, 12, &mut s), AccessOutcome::MissEvict);
    assert_eq!(cache.set(0).unwrap().lines()[1].tag(), 6);
}

/// Direct-mapped: every conflicting tag evicts the single line.
#[test]
fn direct_mapped_conflicts() {
    let mut cache = Cache::new(&CacheConfig::new(0, 1, 0)).unwrap();
    let mut s = CacheStats::default();

    assert_eq!(cache.access(0, 0, 1, &mut s), AccessOutcome::MissFill);
    assert_eq!(cache.access(0, 1, 2, &mut s), AccessOutcome::MissEvict);
    assert_eq!(cache.access(0, 0, 3, &mut s), AccessOutcome::MissEvict);
    assert_eq!(s, stats(0, 3, 2));
}

/// An LRU-defeating cyclic scan of E + 1 tags misses on every access.
#[test]
fn cyclic_scan_thrashes() {
    let mut cache = test_cache();
    let mut s = CacheStats::default();

    let mut stamp = 1;
    for _ in 0..3 {
        for tag in 0..5u64 {
            assert!(cache.access(0, tag, stamp, &mut s).is_miss());
            stamp += 1;
        }
    }
    assert_eq!(s, stats(0, 15, 11));
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn out_of_range_set_panics() {
    let mut cache = test_cache();
    let _ = cache.access(2, 0, 1, &mut CacheStats::default());
}

// ══════════════════════════════════════════════════════════
// 4. Reporting
// ══════════════════════════════════════════════════════════

#[test]
fn outcome_display_and_predicates() {
    assert_eq!(AccessOutcome::Hit.to_string(), "hit");
    assert_eq!(AccessOutcome::MissFill.to_string(), "miss");
    assert_eq!(AccessOutcome::MissEvict.to_string(), "miss eviction");
    assert!(AccessOutcome::Hit.is_hit());
    assert!(AccessOutcome::MissFill.is_miss() && !AccessOutcome::MissFill.is_eviction());
    assert!(AccessOutcome::MissEvict.is_miss() && AccessOutcome::MissEvict.is_eviction());
}

#[test]
fn dump_lists_every_line() {
    let mut cache = Cache::new(&CacheConfig::new(1, 1, 0)).unwrap();
    let _ = cache.access(1, 0x2a, 3, &mut CacheStats::default());

    let mut out = Vec::new();
    cache.dump(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "set: 0; line: 0, valid: 0, tag: 0x0, recency: 0\n\
         set: 1; line: 0, valid: 1, tag: 0x2a, recency: 3\n"
    );
}
