//! Simulation drivers.
//!
//! Provides the event-level replayer and the line-level simulator that feeds
//! it from a trace reader.

/// Event-level replay and outcome accounting.
pub mod replayer;

/// Trace-reader-driven simulator with verbose output.
pub mod simulator;

pub use replayer::{EventOutcome, TraceReplayer};
pub use simulator::Simulator;
