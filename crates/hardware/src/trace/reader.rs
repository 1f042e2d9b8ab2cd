//! Trace file reader.
//!
//! Wraps any `BufRead` and yields one [`TraceRecord`] per non-blank line. It
//! performs:
//! 1. **Line numbering:** Every record and error carries its 1-based line number.
//! 2. **Echo text:** The line is kept verbatim minus its `\n` or `\r\n` terminator.
//! 3. **Error split:** Malformed lines are yielded as recoverable errors; I/O failures end iteration.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::Access;
use super::parser::parse_line;
use crate::common::error::{SimError, TraceError};

/// A successfully parsed trace line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// 1-based line number in the trace.
    pub line: usize,
    /// The line as read, without its terminator.
    pub text: String,
    /// The parsed operation.
    pub access: Access,
}

/// Iterator over the records of a trace.
///
/// Invalid UTF-8 is replaced rather than rejected, so it surfaces as a
/// malformed line instead of an I/O error.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    line: usize,
    buf: Vec<u8>,
    done: bool,
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OpenTrace`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SimError::OpenTrace {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps an already-buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: Vec::new(),
            done: false,
        }
    }

    /// Number of lines consumed so far, blank and malformed lines included.
    pub const fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line += 1;
                    let raw = String::from_utf8_lossy(&self.buf);
                    let text = raw.trim_end_matches(['\n', '\r']);
                    match parse_line(text) {
                        Ok(Some(access)) => {
                            return Some(Ok(TraceRecord {
                                line: self.line,
                                text: text.to_string(),
                                access,
                            }));
                        }
                        Ok(None) => {}
                        Err(source) => {
                            return Some(Err(TraceError::Malformed {
                                line: self.line,
                                text: text.to_string(),
                                source,
                            }));
                        }
                    }
                }
                Err(source) => {
                    self.done = true;
                    return Some(Err(TraceError::Io {
                        line: self.line + 1,
                        source,
                    }));
                }
            }
        }
        None
    }
}
