//! Common types shared across the simulator.
//!
//! This module provides the building blocks every other component uses:
//! 1. **Addresses:** The `Addr` newtype and the tag/set/offset decoder.
//! 2. **Constants:** Address width and allocation limits.
//! 3. **Errors:** Configuration, trace, and run-level error enums.

/// Address type and tag/set-index/block-offset decomposition.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types for configuration, trace parsing, and simulation runs.
pub mod error;

pub use addr::{Addr, DecodedAddr, decode, low_mask};
pub use constants::{ADDRESS_BITS, MAX_CACHE_LINES};
pub use error::{ConfigError, LineError, SimError, TraceError};
