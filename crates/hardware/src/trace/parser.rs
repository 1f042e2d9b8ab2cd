//! Trace line tokenizer.

use super::{Access, AccessKind};
use crate::common::addr::Addr;
use crate::common::error::LineError;

/// Parses one trace line.
///
/// Leading and trailing whitespace is ignored, as is a `0x` prefix on the
/// address. Blank lines carry no event.
///
/// # Arguments
///
/// * `line` - A single line of trace text, with or without its terminator.
///
/// # Returns
///
/// `Ok(Some(access))` for an operation, `Ok(None)` for a blank line.
///
/// # Errors
///
/// Returns a [`LineError`] naming the first field that could not be parsed.
pub fn parse_line(line: &str) -> Result<Option<Access>, LineError> {
    let line = line.trim();
    let mut chars = line.chars();
    let Some(op) = chars.next() else {
        return Ok(None);
    };
    let kind = AccessKind::from_char(op).ok_or(LineError::UnknownOperation(op))?;

    let operands = chars.as_str().trim_start();
    let (addr_text, size_text) = operands.split_once(',').unwrap_or((operands, ""));

    let addr = parse_addr(addr_text.trim())?;
    let size = parse_size(size_text.trim())?;

    Ok(Some(Access { kind, addr, size }))
}

fn parse_addr(text: &str) -> Result<Addr, LineError> {
    if text.is_empty() {
        return Err(LineError::MissingAddress);
    }
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16)
        .map(Addr::new)
        .map_err(|_| LineError::InvalidAddress(text.to_string()))
}

fn parse_size(text: &str) -> Result<u32, LineError> {
    if text.is_empty() {
        return Err(LineError::MissingSize);
    }
    text.parse()
        .map_err(|_| LineError::InvalidSize(text.to_string()))
}
