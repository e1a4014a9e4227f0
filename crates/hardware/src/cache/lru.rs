//! Least Recently Used (LRU) Victim Selection.
//!
//! Recency is tracked implicitly: every access stamps the touched line with a
//! strictly increasing timestamp, so the least recently used line in a set is
//! the one holding the smallest stamp. No per-set usage stack is kept.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - stamping on hit/fill: O(1)
//!   - `victim()`: O(W) where W is the number of ways (associativity)
//! - **Space Complexity:** one `u64` per line
//! - **Best Case:** Working sets that fit within the associativity of each set
//! - **Worst Case:** Cyclic scans of W + 1 blocks through one set (every access evicts)

use super::CacheLine;

/// Index of the first invalid line, in line order.
///
/// Fill order is by index rather than by recency: an invalid line has no
/// meaningful stamp.
#[inline]
pub fn first_invalid(lines: &[CacheLine]) -> Option<usize> {
    lines.iter().position(|line| !line.is_valid())
}

/// Index of the line to evict from a full set.
///
/// Picks the line with the smallest recency stamp. Ties go to the lowest
/// index: the scan only moves to a later line on a strictly smaller stamp.
/// Returns `0` for an empty slice.
#[inline]
pub fn victim(lines: &[CacheLine]) -> usize {
    let mut victim = 0;
    let mut oldest = u64::MAX;
    for (way, line) in lines.iter().enumerate() {
        if line.recency() < oldest {
            oldest = line.recency();
            victim = way;
        }
    }
    victim
}
