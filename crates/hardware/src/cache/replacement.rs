//! Least Recently Used (LRU) Replacement.
//!
//! Each line carries the clock value of its last touch. A hit restamps the
//! line; a miss fills the line with the smallest stamp. The clock advances
//! exactly once per hit or fill, so stamps totally order every touch.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) per access, where W is the associativity
//! - **Space Complexity:** one `u64` per line plus one clock per cache
//! - **Best Case:** working set per set fits within W lines
//! - **Worst Case:** cyclic scans of W + 1 blocks through one set (every access misses)

use super::{AccessOutcome, CacheLine};

/// LRU lookup-and-fill engine holding the recency clock.
#[derive(Clone, Debug, Default)]
pub struct ReplacementEngine {
    clock: u64,
}

impl ReplacementEngine {
    /// Creates an engine whose clock starts at `0`.
    pub const fn new() -> Self {
        Self { clock: 0 }
    }

    /// The most recently issued recency stamp.
    #[inline]
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    #[inline]
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Looks up `tag` in the lines of one set, filling it on a miss.
    ///
    /// On a hit the matching line is restamped. On a miss the LRU line (see
    /// [`Self::victim`]) is overwritten with `tag` and a fresh stamp; the
    /// outcome is [`AccessOutcome::MissEviction`] if that line was valid. An
    /// empty set can hold nothing: the access is a miss, nothing is installed
    /// and the clock does not advance.
    ///
    /// The caller must never place the same tag in two valid lines of one set;
    /// the scan stops at the first match.
    ///
    /// # Arguments
    ///
    /// * `set` - The lines of the set selected by the address's set index.
    /// * `tag` - The address's tag.
    ///
    /// # Returns
    ///
    /// The classification of the access.
    pub fn access(&mut self, set: &mut [CacheLine], tag: u64) -> AccessOutcome {
        if let Some(line) = set
            .iter_mut()
            .find(|line| line.valid && line.tag == tag)
        {
            line.recency = self.tick();
            return AccessOutcome::Hit;
        }

        let Some(way) = Self::victim(set) else {
            return AccessOutcome::Miss;
        };
        let recency = self.tick();
        let line = &mut set[way];
        let outcome = if line.valid {
            AccessOutcome::MissEviction
        } else {
            AccessOutcome::Miss
        };
        *line = CacheLine {
            valid: true,
            tag,
            recency,
        };
        outcome
    }

    /// Selects the way to fill on a miss.
    ///
    /// Returns the way with the smallest recency stamp, preferring the lowest
    /// way on ties, or `None` for an empty set. Untouched lines carry stamp
    /// `0`, so invalid lines are always chosen before any valid one.
    pub fn victim(set: &[CacheLine]) -> Option<usize> {
        set.iter()
            .enumerate()
            .min_by_key(|(_, line)| line.recency)
            .map(|(way, _)| way)
    }
}
