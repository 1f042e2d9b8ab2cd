//! Address decomposition.
//!
//! This module splits a 64-bit memory address into the three fields a
//! set-associative cache indexes by. It provides the following:
//! 1. **Strong typing:** `Addr` wraps a raw address so it cannot be confused with a tag or index.
//! 2. **Field extraction:** `decode` yields block offset, set index, and tag for a geometry.
//! 3. **Masks:** `low_mask` builds the low-order bit masks used by the decoder.

use std::fmt;

use super::constants::ADDRESS_BITS;

/// A byte address as it appears in a memory trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Addr(pub u64);

impl Addr {
    /// Creates a new address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }
}

impl From<u64> for Addr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// The fields of an address under a particular cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddr {
    /// High-order bits identifying the block.
    pub tag: u64,
    /// Bits selecting the set; always `< 2^set_bits`.
    pub set_index: u64,
    /// Byte position within the block; always `< 2^block_bits`.
    pub block_offset: u64,
}

/// Returns a mask with the low `bits` bits set.
///
/// `low_mask(0)` is `0` and `low_mask(64)` is `u64::MAX`.
#[inline]
pub const fn low_mask(bits: u32) -> u64 {
    if bits >= ADDRESS_BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Splits `addr` into tag, set index, and block offset.
///
/// The tag consumes every bit above the set index, so no upper mask is
/// applied. Callers must uphold `set_bits + block_bits < 64`; a validated
/// [`Geometry`](crate::config::Geometry) always does.
///
/// # Arguments
///
/// * `addr` - The address to decompose.
/// * `set_bits` - Number of set-index bits.
/// * `block_bits` - Number of block-offset bits.
///
/// # Returns
///
/// The decoded fields.
#[inline]
pub const fn decode(addr: Addr, set_bits: u32, block_bits: u32) -> DecodedAddr {
    let raw = addr.0;
    DecodedAddr {
        tag: raw >> (block_bits + set_bits),
        set_index: (raw >> block_bits) & low_mask(set_bits),
        block_offset: raw & low_mask(block_bits),
    }
}
