//! Cache lines and sets.
//!
//! A [`CacheSet`] owns a fixed number of [`CacheLine`]s and implements the
//! per-set half of the LRU access: hit detection, fill of a free line, and
//! eviction of the least recently used line once the set is full.

use tracing::trace;

use super::AccessOutcome;
use super::lru;

/// Cache line entry: validity, tag, and the stamp of its last access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    valid: bool,
    tag: u64,
    recency: u64,
}

impl CacheLine {
    /// A valid line holding `tag`, last touched at `recency`.
    pub(crate) const fn filled(tag: u64, recency: u64) -> Self {
        Self {
            valid: true,
            tag,
            recency,
        }
    }

    /// Whether the line holds a block.
    #[inline(always)]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Tag of the held block. Meaningless while the line is invalid.
    #[inline(always)]
    pub const fn tag(&self) -> u64 {
        self.tag
    }

    /// Timestamp of the last access that hit, filled or evicted into this line.
    #[inline(always)]
    pub const fn recency(&self) -> u64 {
        self.recency
    }

    #[inline(always)]
    const fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }

    #[inline(always)]
    fn install(&mut self, tag: u64, timestamp: u64) {
        *self = Self::filled(tag, timestamp);
    }
}

/// One set of a set-associative cache.
///
/// Invariant: no two valid lines hold the same tag. `access` only installs a
/// tag after failing to find it, so the invariant holds for every sequence of
/// accesses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
}

impl CacheSet {
    /// Creates a set of `ways` invalid lines.
    pub(crate) fn new(ways: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); ways],
        }
    }

    /// The lines of this set, in way order.
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// Associativity of the set.
    pub fn ways(&self) -> usize {
        self.lines.len()
    }

    /// Number of lines currently holding a block.
    pub fn valid_count(&self) -> usize {
        self.lines.iter().filter(|line| line.is_valid()).count()
    }

    /// Whether every line holds a block.
    pub fn is_full(&self) -> bool {
        self.lines.iter().all(CacheLine::is_valid)
    }

    /// Way holding `tag`, if it is resident.
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|line| line.matches(tag))
    }

    /// Looks up `tag`, filling or evicting on a miss, and stamps the touched line.
    ///
    /// 1. A valid line holding `tag` is a [`AccessOutcome::Hit`]; its stamp is refreshed.
    /// 2. Otherwise the first invalid line (by way index) receives the block:
    ///    [`AccessOutcome::MissFill`].
    /// 3. Otherwise the line with the smallest stamp (lowest way on ties) is
    ///    overwritten: [`AccessOutcome::MissEvict`].
    ///
    /// Exactly one line is mutated.
    ///
    /// # Arguments
    ///
    /// * `tag` - Tag of the accessed block.
    /// * `timestamp` - Recency stamp for this access; callers supply a fresh,
    ///   increasing value per access.
    pub fn access(&mut self, tag: u64, timestamp: u64) -> AccessOutcome {
        if let Some(way) = self.find(tag) {
            self.lines[way].recency = timestamp;
            trace!(tag, way, "hit");
            return AccessOutcome::Hit;
        }

        if let Some(way) = lru::first_invalid(&self.lines) {
            self.lines[way].install(tag, timestamp);
            trace!(tag, way, "miss: fill");
            return AccessOutcome::MissFill;
        }

        let way = lru::victim(&self.lines);
        let evicted = self.lines[way].tag;
        self.lines[way].install(tag, timestamp);
        trace!(tag, way, evicted, "miss: evict");
        AccessOutcome::MissEvict
    }
}
