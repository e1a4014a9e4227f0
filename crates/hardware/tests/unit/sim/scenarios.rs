//! End-to-end replay scenarios.
//!
//! Small hand-checked traces with known final counters, covering
//! direct-mapped conflicts, fully associative reuse, modifies, and the
//! interaction of block and set bits.

use csim_core::config::CacheConfig;
use csim_core::sim::{TraceEvent, parse_trace, simulate};
use csim_core::stats::CacheStats;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::TraceBuilder;
use crate::common::harness::{replay, stats};

#[rstest]
// With b = 0 and s = 1, address 1 maps to set 1 while 0 and 2 conflict in set 0.
#[case::direct_mapped_conflict(1, 1, 0, &[0, 2, 0], stats(0, 3, 2))]
#[case::direct_mapped_separate_sets(1, 1, 0, &[0, 1, 0], stats(1, 2, 0))]
#[case::single_line_ping_pong(0, 1, 0, &[0, 1, 0], stats(0, 3, 2))]
#[case::two_way_reuse(0, 2, 0, &[0, 1, 0, 1], stats(2, 2, 0))]
#[case::same_block(0, 1, 4, &[0x0, 0x4, 0xF], stats(2, 1, 0))]
#[case::lru_keeps_recent(0, 2, 0, &[0, 1, 0, 2, 0, 1], stats(2, 4, 2))]
fn load_scenarios(
    #[case] set_bits: u32,
    #[case] ways: usize,
    #[case] block_bits: u32,
    #[case] addresses: &[u64],
    #[case] expected: CacheStats,
) {
    let events = TraceBuilder::new().loads(addresses).build();
    assert_eq!(replay(set_bits, ways, block_bits, events), expected);
}

#[test]
fn modify_on_empty_cache() {
    let events = vec![TraceEvent::modify(0x10)];
    assert_eq!(replay(2, 1, 4, events), stats(1, 1, 0));
}

#[test]
fn modify_after_load_hits_twice() {
    let events = TraceBuilder::new().load(0x10).modify(0x10).build();
    assert_eq!(replay(2, 1, 4, events), stats(2, 1, 0));
}

#[test]
fn instructions_do_not_count() {
    let events = TraceBuilder::new()
        .instruction(0x0)
        .instruction(0x10)
        .instruction(0x20)
        .build();
    assert_eq!(replay(0, 1, 0, events), stats(0, 0, 0));
}

#[test]
fn empty_trace() {
    assert_eq!(replay(4, 1, 4, Vec::new()), CacheStats::default());
}

/// A fetch of the same address as a data access does not warm the cache.
#[test]
fn instruction_fetch_does_not_warm() {
    let events = TraceBuilder::new().instruction(0x40).load(0x40).build();
    assert_eq!(replay(1, 1, 4, events), stats(0, 1, 0));
}

/// Tags above the set bits distinguish blocks that share a set.
#[test]
fn high_tags_conflict_in_one_set() {
    // s = 2, b = 4: bits 4..6 select the set, bits 6.. form the tag.
    let a = 0x0000_0010;
    let b = 0x1000_0010;
    let c = 0xFFFF_FFFF_0000_0010;
    let events = TraceBuilder::new().loads(&[a, b, c, a, b, c]).build();
    assert_eq!(replay(2, 2, 4, events), stats(0, 6, 4));
}

/// Full 64-bit offsets: the whole address is block offset, so everything hits
/// after the first access.
#[test]
fn block_covers_whole_address() {
    let events = TraceBuilder::new()
        .loads(&[0, u64::MAX, 0x1234_5678])
        .build();
    assert_eq!(replay(0, 1, 64, events), stats(2, 1, 0));
}

/// A mixed lackey trace replayed from text with a small direct-mapped cache.
#[test]
fn mixed_text_trace() {
    let trace = "\
 L 10,1
 M 20,1
 L 22,1
 S 18,1
 L 110,1
 L 210,1
 M 12,1
";
    // s = 4, E = 1, b = 4: 0x10 and 0x18 share set 1 with tag 0; 0x20 and
    // 0x22 share set 2; 0x110 and 0x210 conflict with 0x10 in set 1.
    let result = simulate(&CacheConfig::new(4, 1, 4), parse_trace(trace)).unwrap();
    assert_eq!(result, stats(4, 5, 3));
}
