//! Simulator-wide constants.

/// Width of a trace address in bits.
pub const ADDRESS_BITS: u32 = 64;

/// Upper bound on `sets × ways` for a single cache.
///
/// At 24 bytes per line the largest accepted cache holds 96 MiB of line
/// state. Larger geometries are rejected when the configuration is validated.
pub const MAX_CACHE_LINES: u64 = 1 << 22;
