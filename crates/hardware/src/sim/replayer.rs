//! Trace replay.
//!
//! `TraceReplayer` owns a cache and its statistics and applies parsed events to
//! them one at a time. It performs:
//! 1. **Filtering:** Instruction fetches are counted as lines and otherwise ignored.
//! 2. **Dispatch:** Loads and stores access the cache once; modifies access it twice.
//! 3. **Accounting:** Every access outcome updates hits, misses, and evictions.

use std::fmt;
use std::iter;

use crate::cache::{AccessOutcome, Cache};
use crate::common::addr::Addr;
use crate::common::error::ConfigError;
use crate::config::Geometry;
use crate::stats::SimStats;
use crate::trace::{Access, AccessKind};

/// What a single data event did to the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// A load or store: one access.
    Single(AccessOutcome),
    /// A modify: the implied load, then the implied store to the same block.
    Modify {
        /// Outcome of the load half.
        load: AccessOutcome,
        /// Outcome of the store half; always a hit.
        store: AccessOutcome,
    },
}

impl EventOutcome {
    /// The first (or only) access outcome.
    pub const fn first(self) -> AccessOutcome {
        match self {
            Self::Single(outcome) => outcome,
            Self::Modify { load, .. } => load,
        }
    }

    /// The second access outcome, present only for modifies.
    pub const fn second(self) -> Option<AccessOutcome> {
        match self {
            Self::Single(_) => None,
            Self::Modify { store, .. } => Some(store),
        }
    }

    /// Iterates the access outcomes in order.
    pub fn iter(self) -> impl Iterator<Item = AccessOutcome> {
        iter::once(self.first()).chain(self.second())
    }
}

/// Space-joined labels, e.g. `miss eviction hit`.
impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(outcome) => write!(f, "{outcome}"),
            Self::Modify { load, store } => write!(f, "{load} {store}"),
        }
    }
}

/// Drives a [`Cache`] from a sequence of trace events.
#[derive(Clone, Debug)]
pub struct TraceReplayer {
    cache: Cache,
    stats: SimStats,
}

impl TraceReplayer {
    /// Creates a replayer over a cold cache.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Allocation`] if the cache cannot be allocated.
    pub fn new(geometry: Geometry) -> Result<Self, ConfigError> {
        Ok(Self {
            cache: Cache::new(geometry)?,
            stats: SimStats::default(),
        })
    }

    /// The simulated cache.
    #[inline]
    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Statistics accumulated so far.
    #[inline]
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Consumes the replayer, returning its statistics.
    pub fn into_stats(self) -> SimStats {
        self.stats
    }

    /// Counts a trace line that was skipped before reaching the replayer.
    pub fn record_skipped(&mut self) {
        self.stats.skipped_lines += 1;
    }

    /// Applies one event.
    ///
    /// # Returns
    ///
    /// `None` for an instruction fetch, otherwise the event's outcome.
    pub fn step(&mut self, access: &Access) -> Option<EventOutcome> {
        self.stats.record_event(access.kind);
        match access.kind {
            AccessKind::Instruction => None,
            AccessKind::Load | AccessKind::Store => {
                Some(EventOutcome::Single(self.touch(access.addr)))
            }
            AccessKind::Modify => {
                let load = self.touch(access.addr);
                let store = self.touch(access.addr);
                debug_assert!(store.is_hit(), "store half of a modify must hit");
                Some(EventOutcome::Modify { load, store })
            }
        }
    }

    /// Applies every event in order.
    ///
    /// # Returns
    ///
    /// One outcome per data event; instruction fetches contribute nothing.
    pub fn replay<'a, I>(&mut self, events: I) -> Vec<EventOutcome>
    where
        I: IntoIterator<Item = &'a Access>,
    {
        events
            .into_iter()
            .filter_map(|access| self.step(access))
            .collect()
    }

    fn touch(&mut self, addr: Addr) -> AccessOutcome {
        let outcome = self.cache.access(addr);
        self.stats.record(outcome);
        outcome
    }
}
