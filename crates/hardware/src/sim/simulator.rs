//! Simulator: a replayer plus run options, fed from a trace reader.
//!
//! Keeps line-level concerns (malformed-line skipping, verbose echo) out of
//! the replayer, which only ever sees parsed events.

use std::io::{BufRead, Write};
use std::path::Path;

use tracing::{debug, warn};

use super::replayer::TraceReplayer;
use crate::common::error::{ConfigError, SimError, TraceError};
use crate::config::{Config, Geometry};
use crate::stats::SimStats;
use crate::trace::TraceReader;

/// Top-level simulator for one cache and one or more traces.
#[derive(Clone, Debug)]
pub struct Simulator {
    replayer: TraceReplayer,
    verbose: bool,
}

impl Simulator {
    /// Validates the configuration and allocates the cache.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is rejected, in which case
    /// nothing is allocated, or if the cache cannot be allocated.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let geometry = config.cache.geometry()?;
        Self::with_geometry(geometry, config.verbose)
    }

    /// Creates a simulator from an already-validated geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Allocation`] if the cache cannot be allocated.
    pub fn with_geometry(geometry: Geometry, verbose: bool) -> Result<Self, ConfigError> {
        debug!(%geometry, verbose, "allocating cache");
        Ok(Self {
            replayer: TraceReplayer::new(geometry)?,
            verbose,
        })
    }

    /// The cache geometry.
    pub const fn geometry(&self) -> &Geometry {
        self.replayer.cache().geometry()
    }

    /// The underlying replayer.
    pub const fn replayer(&self) -> &TraceReplayer {
        &self.replayer
    }

    /// Statistics accumulated so far.
    pub const fn stats(&self) -> &SimStats {
        self.replayer.stats()
    }

    /// Replays every record of `trace`.
    ///
    /// Malformed lines are logged, counted in
    /// [`SimStats::skipped_lines`], and skipped. In verbose mode each data
    /// event is echoed to `out` as its trace text followed by its outcome.
    ///
    /// # Arguments
    ///
    /// * `trace` - Source of trace records.
    /// * `out` - Sink for verbose lines; untouched unless verbose is enabled.
    ///
    /// # Errors
    ///
    /// * [`SimError::ReadTrace`] if the trace cannot be read to the end.
    /// * [`SimError::Output`] if writing to `out` fails.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        trace: TraceReader<R>,
        out: &mut W,
    ) -> Result<&SimStats, SimError> {
        for item in trace {
            match item {
                Ok(record) => {
                    let Some(outcome) = self.replayer.step(&record.access) else {
                        continue;
                    };
                    if self.verbose {
                        writeln!(out, "{} {outcome}", record.text).map_err(SimError::Output)?;
                    }
                }
                Err(TraceError::Malformed { line, text, source }) => {
                    warn!(line, text = %text, error = %source, "skipping malformed trace line");
                    self.replayer.record_skipped();
                }
                Err(TraceError::Io { line, source }) => {
                    return Err(SimError::ReadTrace { line, source });
                }
            }
        }
        out.flush().map_err(SimError::Output)?;

        let stats = self.replayer.stats();
        debug!(
            hits = stats.hits,
            misses = stats.misses,
            evictions = stats.evictions,
            skipped = stats.skipped_lines,
            "trace replay finished"
        );
        Ok(stats)
    }

    /// Opens `path` and replays it.
    ///
    /// # Errors
    ///
    /// [`SimError::OpenTrace`] if the file cannot be opened, otherwise as
    /// [`Self::run`].
    pub fn run_file<W: Write>(
        &mut self,
        path: impl AsRef<Path>,
        out: &mut W,
    ) -> Result<&SimStats, SimError> {
        let path = path.as_ref();
        let trace = TraceReader::open(path)?;
        debug!(path = %path.display(), "replaying trace file");
        self.run(trace, out)
    }
}
