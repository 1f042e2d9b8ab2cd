//! Error definitions.
//!
//! This module defines every failure the simulator can report. It provides:
//! 1. **Configuration errors:** Rejected geometries and unreadable config files, raised before any cache exists.
//! 2. **Line errors:** Why a single trace line could not be tokenized.
//! 3. **Trace errors:** Per-line failures yielded by the trace reader, split into recoverable and fatal.
//! 4. **Simulation errors:** The top-level error returned by a run.

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A cache configuration that cannot be simulated.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Set-index and block-offset bits leave no room for a tag.
    #[error(
        "set bits ({set_bits}) + block bits ({block_bits}) must be less than the {address_bits}-bit address width"
    )]
    AddressBitsExhausted {
        /// Requested set-index bits.
        set_bits: u32,
        /// Requested block-offset bits.
        block_bits: u32,
        /// Width of a trace address.
        address_bits: u32,
    },

    /// A set must hold at least one line.
    #[error("associativity must be at least 1")]
    ZeroAssociativity,

    /// The cache would exceed the allocation ceiling.
    #[error("cache of 2^{set_bits} sets x {ways} ways exceeds the limit of {limit} lines")]
    TooManyLines {
        /// Requested set-index bits.
        set_bits: u32,
        /// Requested associativity.
        ways: usize,
        /// Maximum number of lines allowed.
        limit: u64,
    },

    /// The line storage for a valid geometry could not be reserved.
    #[error("cannot allocate {lines} cache lines")]
    Allocation {
        /// Number of lines requested.
        lines: usize,
        /// Allocator failure.
        #[source]
        source: TryReserveError,
    },

    /// The configuration file could not be read.
    #[error("cannot read config file '{}'", path.display())]
    Read {
        /// Path that failed to open or read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON for [`Config`](crate::config::Config).
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a trace line could not be tokenized.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LineError {
    /// The operation character is not one of `I`, `L`, `S`, `M`.
    #[error("unknown operation '{0}'")]
    UnknownOperation(char),

    /// Nothing follows the operation character.
    #[error("missing address")]
    MissingAddress,

    /// The address is not a hexadecimal 64-bit value.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// The `,<size>` suffix is absent.
    #[error("missing access size")]
    MissingSize,

    /// The size is not a decimal byte count.
    #[error("invalid access size '{0}'")]
    InvalidSize(String),
}

/// A failure yielded by [`TraceReader`](crate::trace::TraceReader) for one line.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed; the trace cannot be continued.
    #[error("I/O error reading trace line {line}")]
    Io {
        /// 1-based line number at which reading failed.
        line: usize,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The line was read but does not follow the trace format.
    #[error("malformed trace line {line} '{text}': {source}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// The offending line, without its terminator.
        text: String,
        /// What was wrong with it.
        #[source]
        source: LineError,
    },
}

impl TraceError {
    /// Returns `true` if the run may continue past this error.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// The error returned by a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// The cache geometry or config file was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The trace file could not be opened.
    #[error("cannot open trace file '{}'", path.display())]
    OpenTrace {
        /// Path of the trace.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Reading the trace failed part-way through.
    #[error("cannot read trace at line {line}")]
    ReadTrace {
        /// 1-based line number at which reading failed.
        line: usize,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Writing verbose or report output failed.
    #[error("cannot write simulator output")]
    Output(#[source] io::Error),
}
