//! Trace-driven cache simulator library.
//!
//! This crate replays valgrind-style memory traces against a tag-only,
//! set-associative cache with LRU replacement:
//! 1. **Common:** Address decomposition, constants, and error types.
//! 2. **Config:** Geometry defaults, JSON configuration, and validation.
//! 3. **Cache:** Lines, sets, and the LRU replacement engine.
//! 4. **Trace:** Line tokenizer and buffered trace reader.
//! 5. **Simulation:** Event replayer and the reader-driven simulator.
//! 6. **Stats:** Hit/miss/eviction counters and reporting.
//!
//! ```
//! use csim_core::config::Geometry;
//! use csim_core::sim::TraceReplayer;
//! use csim_core::trace::Access;
//!
//! let geometry = Geometry::new(1, 1, 1).unwrap();
//! let mut replayer = TraceReplayer::new(geometry).unwrap();
//! let trace = [
//!     Access::load(0, 1),
//!     Access::load(2, 1),
//!     Access::load(4, 1),
//!     Access::load(0, 1),
//! ];
//! let _ = replayer.replay(&trace);
//! assert_eq!(replayer.stats().to_string(), "hits:0 misses:4 evictions:2");
//! ```

/// Common types and constants (addresses, decoder, errors).
pub mod common;
/// Simulator configuration (defaults, JSON config, validated geometry).
pub mod config;
/// Set-associative cache model and LRU replacement.
pub mod cache;
/// Trace events, tokenizer, and reader.
pub mod trace;
/// Trace replay and simulation driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::{Config, Geometry};
/// Cache type; build one from a validated `Geometry`.
pub use crate::cache::{AccessOutcome, Cache};
/// Top-level driver; construct with `Simulator::new`.
pub use crate::sim::{Simulator, TraceReplayer};
/// Counters produced by a run.
pub use crate::stats::SimStats;
