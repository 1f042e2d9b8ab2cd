//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize a run.
//! It provides:
//! 1. **Defaults:** Baseline geometry used when a field is omitted.
//! 2. **Structures:** `Config` and `CacheConfig`, deserializable from JSON.
//! 3. **Validation:** `Geometry`, the checked and immutable form a `Cache` is built from.
//!
//! Configuration is supplied by the command line, optionally seeded from a JSON
//! file. Nothing is allocated until a `CacheConfig` has produced a `Geometry`.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::addr::{Addr, DecodedAddr, decode};
use crate::common::constants::{ADDRESS_BITS, MAX_CACHE_LINES};
use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default number of set-index bits (16 sets).
    pub const SET_BITS: u32 = 4;

    /// Default associativity (1 way = direct-mapped).
    pub const WAYS: usize = 1;

    /// Default number of block-offset bits (16-byte blocks).
    pub const BLOCK_BITS: u32 = 4;
}

/// Cache geometry as requested by the user.
///
/// Unvalidated; call [`CacheConfig::geometry`] before building a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Number of set-index bits (`-s`); the cache has `2^set_bits` sets.
    #[serde(default = "CacheConfig::default_set_bits")]
    pub set_bits: u32,

    /// Lines per set (`-E`).
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Number of block-offset bits (`-b`); blocks are `2^block_bits` bytes.
    #[serde(default = "CacheConfig::default_block_bits")]
    pub block_bits: u32,
}

impl CacheConfig {
    fn default_set_bits() -> u32 {
        defaults::SET_BITS
    }

    fn default_ways() -> usize {
        defaults::WAYS
    }

    fn default_block_bits() -> u32 {
        defaults::BLOCK_BITS
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry cannot be simulated.
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        Geometry::new(self.set_bits, self.ways, self.block_bits)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            set_bits: defaults::SET_BITS,
            ways: defaults::WAYS,
            block_bits: defaults::BLOCK_BITS,
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use csim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.cache.ways, 1);
/// assert!(!config.verbose);
/// ```
///
/// Deserializing from JSON; omitted fields take their defaults:
///
/// ```
/// use csim_core::config::Config;
///
/// let json = r#"{ "cache": { "set_bits": 5, "ways": 4 }, "verbose": true }"#;
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.cache.set_bits, 5);
/// assert_eq!(config.cache.ways, 4);
/// assert_eq!(config.cache.block_bits, 4);
/// assert!(config.verbose);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Cache geometry.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Echo every data-access trace line with its outcome.
    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the JSON does not match the schema.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its contents are not a valid configuration.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// A validated cache geometry.
///
/// Guarantees `set_bits + block_bits < 64`, `ways >= 1`, and that
/// `2^set_bits * ways` fits under [`MAX_CACHE_LINES`]. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Geometry {
    set_bits: u32,
    ways: usize,
    block_bits: u32,
}

impl Geometry {
    /// Checks and builds a geometry.
    ///
    /// # Arguments
    ///
    /// * `set_bits` - Number of set-index bits.
    /// * `ways` - Associativity (lines per set).
    /// * `block_bits` - Number of block-offset bits.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::AddressBitsExhausted`] if `set_bits + block_bits >= 64`.
    /// * [`ConfigError::ZeroAssociativity`] if `ways == 0`.
    /// * [`ConfigError::TooManyLines`] if the cache would exceed [`MAX_CACHE_LINES`].
    pub fn new(set_bits: u32, ways: usize, block_bits: u32) -> Result<Self, ConfigError> {
        let index_bits = set_bits.checked_add(block_bits);
        if index_bits.is_none_or(|bits| bits >= ADDRESS_BITS) {
            return Err(ConfigError::AddressBitsExhausted {
                set_bits,
                block_bits,
                address_bits: ADDRESS_BITS,
            });
        }
        if ways == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }

        let total_lines = (1u64 << set_bits).checked_mul(ways as u64);
        if total_lines.is_none_or(|lines| lines > MAX_CACHE_LINES) {
            return Err(ConfigError::TooManyLines {
                set_bits,
                ways,
                limit: MAX_CACHE_LINES,
            });
        }

        Ok(Self {
            set_bits,
            ways,
            block_bits,
        })
    }

    /// Number of set-index bits.
    #[inline]
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Number of block-offset bits.
    #[inline]
    pub const fn block_bits(&self) -> u32 {
        self.block_bits
    }

    /// Lines per set.
    #[inline]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Number of sets, `2^set_bits`.
    #[inline]
    pub const fn num_sets(&self) -> usize {
        1usize << self.set_bits
    }

    /// Block size in bytes, `2^block_bits`.
    #[inline]
    pub const fn block_bytes(&self) -> u64 {
        1u64 << self.block_bits
    }

    /// Total number of lines across all sets.
    #[inline]
    pub const fn total_lines(&self) -> usize {
        self.num_sets() * self.ways
    }

    /// Number of address bits left for the tag.
    #[inline]
    pub const fn tag_bits(&self) -> u32 {
        ADDRESS_BITS - self.set_bits - self.block_bits
    }

    /// Splits `addr` under this geometry.
    #[inline]
    pub const fn decode(&self, addr: Addr) -> DecodedAddr {
        decode(addr, self.set_bits, self.block_bits)
    }
}

impl TryFrom<CacheConfig> for Geometry {
    type Error = ConfigError;

    fn try_from(config: CacheConfig) -> Result<Self, Self::Error> {
        config.geometry()
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "s={} E={} b={} ({} sets x {} ways, {}-byte blocks)",
            self.set_bits,
            self.ways,
            self.block_bits,
            self.num_sets(),
            self.ways,
            self.block_bytes()
        )
    }
}
