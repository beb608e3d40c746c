//! Line-oriented reading of access logs.
//!
//! Opens the configured source and turns its lines into request timestamps.
//! Lines that are not CLF are counted and dropped here; they never reach the
//! aggregation stage.

use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use chrono::NaiveDateTime;
use rps_core::error::{Result, RpsError};
use tracing::debug;

use crate::parser::LogParser;

// ── Public API ────────────────────────────────────────────────────────────────

/// Timestamps extracted from one pass over a source, plus line counters.
#[derive(Debug, Clone, Default)]
pub struct ReadOutcome {
    /// Accepted timestamps in file order.
    pub timestamps: Vec<NaiveDateTime>,
    /// Non-blank lines seen.
    pub lines_read: u64,
    /// Non-blank lines that did not parse.
    pub lines_skipped: u64,
}

/// Open `path` for reading, mapping failures to user-facing errors.
pub fn open_log_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| RpsError::from_open(path, e))
}

/// Read one line from `reader` into `buf`, decoding lossily.
///
/// Returns the number of raw bytes consumed (zero at end of stream). The
/// trailing newline, if any, is kept in `buf`.
pub fn read_line_lossy<R: BufRead>(reader: &mut R, buf: &mut String) -> std::io::Result<usize> {
    let mut raw = Vec::new();
    let n = reader.read_until(b'\n', &mut raw)?;
    buf.push_str(&String::from_utf8_lossy(&raw));
    Ok(n)
}

/// Consume `reader` to the end and collect every parseable timestamp.
///
/// Blank lines are ignored outright. Invalid UTF-8 is replaced rather than
/// aborting the read.
pub fn read_timestamps<R: BufRead>(mut reader: R) -> std::io::Result<ReadOutcome> {
    let mut outcome = ReadOutcome::default();
    let mut line = String::new();

    loop {
        line.clear();
        if read_line_lossy(&mut reader, &mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        outcome.lines_read += 1;
        match LogParser::parse_timestamp(&line) {
            Some(ts) => outcome.timestamps.push(ts),
            None => outcome.lines_skipped += 1,
        }
    }

    debug!(
        "Read {} lines: {} accepted, {} skipped",
        outcome.lines_read,
        outcome.timestamps.len(),
        outcome.lines_skipped
    );

    Ok(outcome)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
