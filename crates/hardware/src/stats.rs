//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters a replay produces. It provides:
//! 1. **Outcome counters:** Hits, misses, and evictions, the simulator's primary result.
//! 2. **Trace mix:** Counts of loads, stores, modifies, instruction lines, and skipped lines.
//! 3. **Derived rates:** Hit, miss, and eviction rates over all cache accesses.
//! 4. **Reporting:** The one-line summary and a sectioned breakdown.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::cache::AccessOutcome;
use crate::trace::AccessKind;

/// Simulation statistics for one replay.
///
/// `hits + misses` always equals the number of cache accesses performed:
/// one per load or store, two per modify.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Accesses that found their block resident.
    pub hits: u64,
    /// Accesses that had to fill a line.
    pub misses: u64,
    /// Misses that displaced a valid line.
    pub evictions: u64,

    /// Load events replayed.
    pub loads: u64,
    /// Store events replayed.
    pub stores: u64,
    /// Modify events replayed.
    pub modifies: u64,
    /// Instruction-fetch lines seen and ignored.
    pub instructions: u64,
    /// Malformed trace lines skipped.
    pub skipped_lines: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"trace"`, `"rates"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "trace", "rates"];

const RULE_HEAVY: &str = "==========================================================";
const RULE_LIGHT: &str = "----------------------------------------------------------";

impl SimStats {
    /// Counts one cache access outcome.
    #[inline]
    pub fn record(&mut self, outcome: AccessOutcome) {
        match outcome {
            AccessOutcome::Hit => self.hits += 1,
            AccessOutcome::Miss => self.misses += 1,
            AccessOutcome::MissEviction => {
                self.misses += 1;
                self.evictions += 1;
            }
        }
    }

    /// Counts one trace event by kind.
    #[inline]
    pub fn record_event(&mut self, kind: AccessKind) {
        match kind {
            AccessKind::Instruction => self.instructions += 1,
            AccessKind::Load => self.loads += 1,
            AccessKind::Store => self.stores += 1,
            AccessKind::Modify => self.modifies += 1,
        }
    }

    /// Total cache accesses, `hits + misses`.
    #[inline]
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Data events replayed (loads, stores, and modifies).
    #[inline]
    pub const fn data_events(&self) -> u64 {
        self.loads + self.stores + self.modifies
    }

    /// Fraction of accesses that hit, or `0.0` before any access.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.accesses())
    }

    /// Fraction of accesses that missed, or `0.0` before any access.
    pub fn miss_rate(&self) -> f64 {
        ratio(self.misses, self.accesses())
    }

    /// Fraction of misses that evicted a valid line, or `0.0` before any miss.
    pub fn eviction_rate(&self) -> f64 {
        ratio(self.evictions, self.misses)
    }

    /// Writes the requested statistics sections to `out`.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to write every section. Unknown names are ignored.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn write_sections<W: Write>(&self, out: &mut W, sections: &[String]) -> io::Result<()> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let events = self.data_events();

        writeln!(out, "{RULE_HEAVY}")?;
        writeln!(out, "CACHE SIMULATION STATISTICS")?;
        writeln!(out, "{RULE_HEAVY}")?;
        if want("summary") {
            writeln!(out, "SUMMARY")?;
            writeln!(out, "  hits                   {}", self.hits)?;
            writeln!(out, "  misses                 {}", self.misses)?;
            writeln!(out, "  evictions              {}", self.evictions)?;
            writeln!(out, "{RULE_LIGHT}")?;
        }
        if want("trace") {
            writeln!(out, "TRACE MIX")?;
            for (name, count) in [
                ("op.load", self.loads),
                ("op.store", self.stores),
                ("op.modify", self.modifies),
            ] {
                writeln!(
                    out,
                    "  {name:<22} {count} ({:.2}%)",
                    ratio(count, events) * 100.0
                )?;
            }
            writeln!(out, "  lines.instruction      {}", self.instructions)?;
            writeln!(out, "  lines.skipped          {}", self.skipped_lines)?;
            writeln!(out, "{RULE_LIGHT}")?;
        }
        if want("rates") {
            writeln!(out, "RATES")?;
            writeln!(out, "  accesses               {}", self.accesses())?;
            writeln!(out, "  hit_rate               {:.2}%", self.hit_rate() * 100.0)?;
            writeln!(out, "  miss_rate              {:.2}%", self.miss_rate() * 100.0)?;
            writeln!(
                out,
                "  eviction_rate          {:.2}%",
                self.eviction_rate() * 100.0
            )?;
        }
        writeln!(out, "{RULE_HEAVY}")
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written.
    pub fn print_sections(&self, sections: &[String]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_sections(&mut out, sections)
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written.
    pub fn print(&self) -> io::Result<()> {
        self.print_sections(&[])
    }
}

/// The machine-parseable summary line, `hits:<n> misses:<n> evictions:<n>`.
impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{}",
            self.hits, self.misses, self.evictions
        )
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
