//! Memory access traces.
//!
//! This module turns valgrind-style trace text into access events. It provides:
//! 1. **Events:** `AccessKind` and `Access`, one parsed trace operation.
//! 2. **Tokenizing:** `parse_line`, which classifies a single line.
//! 3. **Reading:** `TraceReader`, a line-numbered iterator over any buffered reader.
//!
//! Trace lines look like `I 0400d7d4,8` (instruction fetch) or ` L 7ff0005c8,8`
//! (data access, with `L`oad, `S`tore, or `M`odify).

/// Single-line tokenizer.
pub mod parser;

/// Buffered, line-numbered trace reader.
pub mod reader;

use std::fmt;

use serde::Serialize;

pub use self::parser::parse_line;
pub use self::reader::{TraceReader, TraceRecord};
use crate::common::addr::Addr;

/// The operation recorded on a trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    /// Instruction fetch (`I`); never simulated.
    Instruction,
    /// Data load (`L`).
    Load,
    /// Data store (`S`).
    Store,
    /// Data modify (`M`): a load followed by a store to the same address.
    Modify,
}

impl AccessKind {
    /// Maps a trace operation character to its kind.
    pub const fn from_char(op: char) -> Option<Self> {
        match op {
            'I' => Some(Self::Instruction),
            'L' => Some(Self::Load),
            'S' => Some(Self::Store),
            'M' => Some(Self::Modify),
            _ => None,
        }
    }

    /// The trace operation character for this kind.
    pub const fn as_char(self) -> char {
        match self {
            Self::Instruction => 'I',
            Self::Load => 'L',
            Self::Store => 'S',
            Self::Modify => 'M',
        }
    }

    /// Number of cache accesses this kind performs.
    pub const fn sub_accesses(self) -> usize {
        match self {
            Self::Instruction => 0,
            Self::Load | Self::Store => 1,
            Self::Modify => 2,
        }
    }
}

/// One parsed trace operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Access {
    /// What kind of operation this is.
    pub kind: AccessKind,
    /// The byte address accessed.
    pub addr: Addr,
    /// Bytes accessed. Carried for the trace format; the simulation ignores it.
    pub size: u32,
}

impl Access {
    /// Creates an access of the given kind.
    pub const fn new(kind: AccessKind, addr: u64, size: u32) -> Self {
        Self {
            kind,
            addr: Addr::new(addr),
            size,
        }
    }

    /// Shorthand for an instruction fetch.
    pub const fn instruction(addr: u64, size: u32) -> Self {
        Self::new(AccessKind::Instruction, addr, size)
    }

    /// Shorthand for a load.
    pub const fn load(addr: u64, size: u32) -> Self {
        Self::new(AccessKind::Load, addr, size)
    }

    /// Shorthand for a store.
    pub const fn store(addr: u64, size: u32) -> Self {
        Self::new(AccessKind::Store, addr, size)
    }

    /// Shorthand for a modify.
    pub const fn modify(addr: u64, size: u32) -> Self {
        Self::new(AccessKind::Modify, addr, size)
    }
}

/// Formats the access as a trace line, without a terminator.
///
/// Data accesses are indented by one space the way valgrind writes them.
impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = if self.kind == AccessKind::Instruction {
            ""
        } else {
            " "
        };
        write!(
            f,
            "{indent}{} {:x},{}",
            self.kind.as_char(),
            self.addr.val(),
            self.size
        )
    }
}
