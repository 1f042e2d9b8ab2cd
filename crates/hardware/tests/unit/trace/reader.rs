//! # Trace Reader Tests
//!
//! Covers line numbering, verbatim echo text, blank-line skipping, malformed
//! lines as recoverable errors, and opening trace files from disk.

use std::io::{self, BufRead, Read};

use csim_core::common::error::{LineError, SimError, TraceError};
use csim_core::trace::{Access, TraceReader, TraceRecord};
use pretty_assertions::assert_eq;

use crate::common::temp_trace;

fn read_all(text: &str) -> Vec<Result<TraceRecord, TraceError>> {
    TraceReader::new(text.as_bytes()).collect()
}

#[test]
fn records_keep_line_numbers_and_text() {
    let records: Vec<TraceRecord> = read_all("I 0400d7d4,8\n L 10,1\n M 20,1\n")
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(
        records,
        vec![
            TraceRecord {
                line: 1,
                text: "I 0400d7d4,8".to_string(),
                access: Access::instruction(0x0400_d7d4, 8),
            },
            TraceRecord {
                line: 2,
                text: " L 10,1".to_string(),
                access: Access::load(0x10, 1),
            },
            TraceRecord {
                line: 3,
                text: " M 20,1".to_string(),
                access: Access::modify(0x20, 1),
            },
        ]
    );
}

#[test]
fn crlf_and_missing_final_newline() {
    let records: Vec<TraceRecord> = read_all(" L 10,1\r\n S 18,4")
        .into_iter()
        .map(Result::unwrap)
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text, " L 10,1");
    assert_eq!(records[1].text, " S 18,4");
    assert_eq!(records[1].access, Access::store(0x18, 4));
}

#[test]
fn blank_lines_are_skipped_but_counted() {
    let mut reader = TraceReader::new("\n L 10,1\n\n\n S 10,1\n".as_bytes());
    let first = reader.next().unwrap().unwrap();
    assert_eq!(first.line, 2);
    let second = reader.next().unwrap().unwrap();
    assert_eq!(second.line, 5);
    assert!(reader.next().is_none());
    assert_eq!(reader.lines_read(), 5);
}

#[test]
fn malformed_line_is_recoverable() {
    let items = read_all(" L 10,1\n Q 10,1\n S 10,1\n");
    assert_eq!(items.len(), 3);
    assert!(items[0].is_ok());
    assert!(items[2].is_ok());

    match &items[1] {
        Err(err @ TraceError::Malformed { line, text, source }) => {
            assert!(err.is_recoverable());
            assert_eq!(*line, 2);
            assert_eq!(text, " Q 10,1");
            assert_eq!(*source, LineError::UnknownOperation('Q'));
        }
        other => panic!("expected malformed line, got {other:?}"),
    }
}

#[test]
fn invalid_utf8_is_malformed_not_fatal() {
    let bytes: &[u8] = b" L 10,1\n\xff\xfe 10,1\n S 10,1\n";
    let items: Vec<_> = TraceReader::new(bytes).collect();
    assert_eq!(items.len(), 3);
    assert!(matches!(items[1], Err(TraceError::Malformed { line: 2, .. })));
    assert!(items[2].is_ok());
}

/// A reader that yields one good line and then fails.
struct FailingReader {
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk gone"))
    }
}

impl BufRead for FailingReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.served {
            Err(io::Error::other("disk gone"))
        } else {
            Ok(b" L 10,1\n")
        }
    }

    fn consume(&mut self, _amt: usize) {
        self.served = true;
    }
}

#[test]
fn io_error_ends_iteration() {
    let mut reader = TraceReader::new(FailingReader { served: false });
    assert!(reader.next().unwrap().is_ok());

    let err = reader.next().unwrap().unwrap_err();
    assert!(!err.is_recoverable());
    assert!(matches!(err, TraceError::Io { line: 2, .. }));
    assert!(reader.next().is_none());
}

#[test]
fn open_reads_file_from_disk() {
    let file = temp_trace(" L 10,1\n S 20,1\n");
    let records: Vec<_> = TraceReader::open(file.path())
        .unwrap()
        .map(Result::unwrap)
        .collect();
    assert_eq!(records.len(), 2);
}

#[test]
fn open_missing_file_is_open_error() {
    let err = TraceReader::open("/nonexistent/trace.trace").unwrap_err();
    assert!(matches!(err, SimError::OpenTrace { .. }));
    assert!(err.to_string().contains("/nonexistent/trace.trace"));
}
