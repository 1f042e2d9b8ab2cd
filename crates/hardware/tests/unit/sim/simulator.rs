//! Simulator Driver Tests.
//!
//! Runs whole traces through `Simulator::run` and `Simulator::run_file`:
//! verbose echo format, quiet mode, malformed-line skipping, and the error
//! paths for configuration, missing files, and failing output.

use std::io::{self, Write};

use csim_core::common::error::{ConfigError, SimError};
use csim_core::config::{CacheConfig, Config};
use csim_core::trace::{Access, TraceReader};
use csim_core::Simulator;
use pretty_assertions::assert_eq;

use crate::common::{geometry, init_logging, temp_trace, trace_text};

fn run_verbose(set_bits: u32, ways: usize, block_bits: u32, trace: &str) -> (String, String) {
    init_logging();
    let mut sim = Simulator::with_geometry(geometry(set_bits, ways, block_bits), true).unwrap();
    let mut out = Vec::new();
    let summary = sim
        .run(TraceReader::new(trace.as_bytes()), &mut out)
        .unwrap()
        .to_string();
    (String::from_utf8(out).unwrap(), summary)
}

// ══════════════════════════════════════════════════════════
// 1. Verbose Output
// ══════════════════════════════════════════════════════════

#[test]
fn verbose_echoes_line_and_outcomes() {
    let trace = "I 0400d7d4,8\n L 10,1\n M 20,1\n L 22,1\n S 18,1\n L 110,1\n L 210,1\n M 12,1\n";
    let (out, summary) = run_verbose(4, 1, 4, trace);

    assert_eq!(
        out,
        " L 10,1 miss\n\
         \x20M 20,1 miss hit\n\
         \x20L 22,1 hit\n\
         \x20S 18,1 hit\n\
         \x20L 110,1 miss eviction\n\
         \x20L 210,1 miss eviction\n\
         \x20M 12,1 miss eviction hit\n"
    );
    assert_eq!(summary, "hits:4 misses:5 evictions:3");
}

#[test]
fn verbose_echoes_address_text_verbatim() {
    let (out, _) = run_verbose(0, 1, 0, " L 0x0000ff,4\n");
    assert_eq!(out, " L 0x0000ff,4 miss\n");
}

#[test]
fn quiet_mode_writes_nothing() {
    let mut sim = Simulator::with_geometry(geometry(1, 1, 1), false).unwrap();
    let mut out = Vec::new();
    let stats = sim
        .run(TraceReader::new(" L 0,1\n L 2,1\n".as_bytes()), &mut out)
        .unwrap();
    assert_eq!(stats.misses, 2);
    assert!(out.is_empty());
}

// ══════════════════════════════════════════════════════════
// 2. Malformed Lines
// ══════════════════════════════════════════════════════════

#[test]
fn malformed_lines_are_skipped_and_counted() {
    let trace = " L 10,1\n==12== junk\n L zz,1\n\n L 10,1\n";
    let (out, summary) = run_verbose(0, 1, 4, trace);

    assert_eq!(out, " L 10,1 miss\n L 10,1 hit\n");
    assert_eq!(summary, "hits:1 misses:1 evictions:0");

    let mut sim = Simulator::with_geometry(geometry(0, 1, 4), false).unwrap();
    let stats = sim
        .run(TraceReader::new(trace.as_bytes()), &mut io::sink())
        .unwrap();
    assert_eq!(stats.skipped_lines, 2);
    assert_eq!(stats.loads, 2);
}

#[test]
fn empty_trace_is_all_zero() {
    let mut sim = Simulator::with_geometry(geometry(2, 2, 2), true).unwrap();
    let mut out = Vec::new();
    let stats = sim.run(TraceReader::new(&b""[..]), &mut out).unwrap();
    assert_eq!(stats.to_string(), "hits:0 misses:0 evictions:0");
    assert!(out.is_empty());
}

// ══════════════════════════════════════════════════════════
// 3. Files
// ══════════════════════════════════════════════════════════

#[test]
fn run_file_replays_trace_on_disk() {
    let text = trace_text(&[
        Access::load(0, 1),
        Access::load(2, 1),
        Access::load(4, 1),
        Access::load(0, 1),
    ]);
    let file = temp_trace(&text);

    let mut sim = Simulator::with_geometry(geometry(1, 1, 1), false).unwrap();
    let stats = sim.run_file(file.path(), &mut io::sink()).unwrap();
    assert_eq!(stats.to_string(), "hits:0 misses:4 evictions:2");
}

#[test]
fn run_file_missing_trace() {
    let mut sim = Simulator::with_geometry(geometry(1, 1, 1), false).unwrap();
    let err = sim
        .run_file("/nonexistent/dir/missing.trace", &mut io::sink())
        .unwrap_err();
    assert!(matches!(err, SimError::OpenTrace { .. }));
    assert_eq!(sim.stats().accesses(), 0);
}

/// Consecutive runs accumulate into the same cache and counters.
#[test]
fn runs_accumulate() {
    let mut sim = Simulator::with_geometry(geometry(0, 1, 0), false).unwrap();
    let _ = sim
        .run(TraceReader::new(" L 1,1\n".as_bytes()), &mut io::sink())
        .unwrap();
    let stats = sim
        .run(TraceReader::new(" L 1,1\n".as_bytes()), &mut io::sink())
        .unwrap();
    assert_eq!(stats.to_string(), "hits:1 misses:1 evictions:0");
}

// ══════════════════════════════════════════════════════════
// 4. Construction and Output Errors
// ══════════════════════════════════════════════════════════

#[test]
fn new_uses_config_geometry() {
    let config = Config {
        cache: CacheConfig {
            set_bits: 3,
            ways: 2,
            block_bits: 5,
        },
        verbose: false,
    };
    let sim = Simulator::new(&config).unwrap();
    assert_eq!(sim.geometry().num_sets(), 8);
    assert_eq!(sim.geometry().ways(), 2);
    assert_eq!(sim.geometry().block_bytes(), 32);
    assert_eq!(sim.replayer().cache().sets().len(), 8);
}

#[test]
fn new_rejects_invalid_config() {
    let config = Config {
        cache: CacheConfig {
            set_bits: 4,
            ways: 0,
            block_bits: 4,
        },
        verbose: true,
    };
    assert!(matches!(
        Simulator::new(&config),
        Err(ConfigError::ZeroAssociativity)
    ));
}

/// Geometries past the line ceiling fail as configuration errors before the
/// cache is allocated.
#[test]
fn new_rejects_geometry_past_line_ceiling() {
    let config = Config {
        cache: CacheConfig {
            set_bits: 27,
            ways: 2,
            block_bits: 4,
        },
        verbose: false,
    };
    let err = Simulator::new(&config).unwrap_err();
    assert!(matches!(err, ConfigError::TooManyLines { .. }));
    assert!(SimError::from(err).to_string().contains("exceeds the limit"));
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn verbose_write_failure_is_output_error() {
    let mut sim = Simulator::with_geometry(geometry(0, 1, 0), true).unwrap();
    let err = sim
        .run(TraceReader::new(" L 1,1\n".as_bytes()), &mut BrokenPipe)
        .unwrap_err();
    assert!(matches!(err, SimError::Output(_)));
}

#[test]
fn quiet_mode_never_touches_output() {
    let mut sim = Simulator::with_geometry(geometry(0, 1, 0), false).unwrap();
    let stats = sim
        .run(TraceReader::new(" L 1,1\n".as_bytes()), &mut BrokenPipe)
        .unwrap();
    assert_eq!(stats.misses, 1);
}
