//! Set-Associative Cache Model.
//!
//! This module implements the tag-only state of a set-associative cache. It
//! provides:
//! 1. **Lines and sets:** `CacheLine` (valid bit, tag, recency stamp), viewed a set at a time through `CacheSet`.
//! 2. **The cache:** `Cache`, one flat line vector sized once from a validated `Geometry`.
//! 3. **Outcomes:** `AccessOutcome`, the classification of a single access.
//!
//! No data is stored; only the presence of a block is tracked. Victim selection
//! lives in [`replacement`].

/// LRU lookup, victim selection, and fill.
pub mod replacement;

use std::fmt;

use serde::Serialize;
use tracing::trace;

pub use self::replacement::ReplacementEngine;
use crate::common::addr::Addr;
use crate::common::error::ConfigError;
use crate::config::Geometry;

/// Classification of one cache access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessOutcome {
    /// The block was resident.
    Hit,
    /// The block was absent and filled an invalid line.
    Miss,
    /// The block was absent and displaced a valid line.
    MissEviction,
}

impl AccessOutcome {
    /// Returns the verbose-trace label: `hit`, `miss`, or `miss eviction`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::MissEviction => "miss eviction",
        }
    }

    /// Returns `true` for [`AccessOutcome::Hit`].
    #[inline]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }

    /// Returns `true` if a valid line was displaced.
    #[inline]
    pub const fn is_eviction(self) -> bool {
        matches!(self, Self::MissEviction)
    }
}

impl fmt::Display for AccessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache line entry.
///
/// `tag` is meaningful only while `valid` is set. `recency` is the engine clock
/// value at the line's last touch; `0` means never touched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Whether the line holds a block.
    pub valid: bool,
    /// Tag of the resident block.
    pub tag: u64,
    /// Clock stamp of the last hit or fill.
    pub recency: u64,
}

/// Read-only view of one set: its lines in way order.
///
/// Way order has no meaning beyond slot identity and LRU tie-breaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheSet<'a> {
    lines: &'a [CacheLine],
}

impl<'a> CacheSet<'a> {
    /// Wraps the lines of one set.
    #[inline]
    pub const fn new(lines: &'a [CacheLine]) -> Self {
        Self { lines }
    }

    /// The lines of this set, in way order.
    #[inline]
    pub const fn lines(&self) -> &'a [CacheLine] {
        self.lines
    }

    /// Associativity of this set.
    #[inline]
    pub const fn ways(&self) -> usize {
        self.lines.len()
    }

    /// Number of lines currently holding a block.
    pub fn valid_count(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }

    /// Returns the way holding `tag`, if any.
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }
}

/// Tag-only set-associative cache with LRU replacement.
///
/// Lines live in one flat vector of `num_sets * ways` entries; set `i` is the
/// slice `lines[i * ways..(i + 1) * ways]`. The cache owns the recency clock,
/// so independent caches never share state.
#[derive(Clone, Debug)]
pub struct Cache {
    geometry: Geometry,
    lines: Vec<CacheLine>,
    engine: ReplacementEngine,
}

impl Cache {
    /// Allocates a cold cache for `geometry`.
    ///
    /// Every line starts invalid with recency `0`. The line vector is never
    /// resized afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Allocation`] if the line storage cannot be
    /// reserved.
    pub fn new(geometry: Geometry) -> Result<Self, ConfigError> {
        let total = geometry.total_lines();
        let mut lines = Vec::new();
        lines
            .try_reserve_exact(total)
            .map_err(|source| ConfigError::Allocation {
                lines: total,
                source,
            })?;
        lines.resize(total, CacheLine::default());
        Ok(Self {
            geometry,
            lines,
            engine: ReplacementEngine::new(),
        })
    }

    /// The geometry this cache was built with.
    #[inline]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// All sets, indexed by set index.
    pub fn sets(&self) -> impl ExactSizeIterator<Item = CacheSet<'_>> {
        self.lines
            .chunks_exact(self.geometry.ways())
            .map(CacheSet::new)
    }

    /// The set at `index`, or `None` if out of range.
    pub fn set(&self, index: usize) -> Option<CacheSet<'_>> {
        let ways = self.geometry.ways();
        let start = index.checked_mul(ways)?;
        self.lines
            .get(start..start.checked_add(ways)?)
            .map(CacheSet::new)
    }

    /// Current value of the recency clock (number of hits plus fills so far).
    #[inline]
    pub const fn clock(&self) -> u64 {
        self.engine.clock()
    }

    /// Performs one access to `addr`.
    ///
    /// Decodes the address, then lets the replacement engine look up, and
    /// if necessary fill, the selected set.
    ///
    /// # Arguments
    ///
    /// * `addr` - The byte address accessed.
    ///
    /// # Returns
    ///
    /// Whether the access hit, missed, or missed and evicted.
    ///
    /// # Panics
    ///
    /// This function will not panic. `set_index` is masked to `set_bits` bits,
    /// so `set_index < num_sets` and the set's slice lies inside `lines`.
    pub fn access(&mut self, addr: Addr) -> AccessOutcome {
        let decoded = self.geometry.decode(addr);
        let ways = self.geometry.ways();
        let start = decoded.set_index as usize * ways;
        let outcome = self
            .engine
            .access(&mut self.lines[start..start + ways], decoded.tag);
        trace!(
            %addr,
            set = decoded.set_index,
            tag = decoded.tag,
            outcome = outcome.as_str(),
            "cache access"
        );
        outcome
    }

    /// Checks whether the block containing `addr` is resident, without
    /// touching recency.
    pub fn contains(&self, addr: Addr) -> bool {
        let decoded = self.geometry.decode(addr);
        self.set(decoded.set_index as usize)
            .is_some_and(|set| set.find(decoded.tag).is_some())
    }

    /// Number of valid lines across the whole cache.
    pub fn valid_lines(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }
}
