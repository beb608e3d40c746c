//! Live tailing of a growing access log.
//!
//! [`FollowEngine`] reads everything already in the file (priming), then
//! keeps polling for appended lines and prints the most recent second's
//! count after every accepted request. It stops only when the shutdown
//! channel flips to `true`, and prints the full report on the way out.
//!
//! The shutdown signal is checked between line reads, never while a line is
//! being parsed, so the final report always covers a whole number of lines.

use std::io::{BufRead, BufReader, Read, Seek, Write};
use std::time::Duration;

use chrono::NaiveDateTime;
use rps_core::error::{Result, RpsError};
use rps_core::formatting::{format_series_entry, initial_summary_line, report_lines, RULE};
use rps_core::models::{CountSeries, RpsStats};
use rps_data::filter::{filter_by_date, DateRange};
use rps_data::parser::LogParser;
use tokio::sync::watch;
use tokio::time;

// ── Public types ──────────────────────────────────────────────────────────────

/// Running state of a follow session.
#[derive(Debug, Default)]
pub struct FollowState {
    /// Per-second counts of every accepted request so far.
    pub series: CountSeries,
    /// Number of accepted requests (sum of `series`).
    pub accepted: u64,
    /// Byte offset just past the last byte consumed from the source.
    pub cursor: u64,
    /// Bytes of a line whose newline has not been written yet.
    pending: Vec<u8>,
}

/// Result handed back once a follow session terminates.
#[derive(Debug, Clone)]
pub struct FollowSummary {
    pub series: CountSeries,
    pub stats: Option<RpsStats>,
    pub accepted: u64,
}

// ── FollowEngine ──────────────────────────────────────────────────────────────

/// Incremental request counter over a seekable, growing source.
///
/// Each accepted line updates exactly one bucket of the series in place.
pub struct FollowEngine<R> {
    reader: BufReader<R>,
    range: DateRange,
    poll_interval: Duration,
    state: FollowState,
    /// Width of the last status line, used to blank out leftovers.
    status_width: usize,
}

impl<R: Read + Seek> FollowEngine<R> {
    /// Create an engine reading `source` from its current position.
    pub fn new(source: R, range: DateRange, poll_interval: Duration) -> Self {
        Self {
            reader: BufReader::new(source),
            range,
            poll_interval,
            state: FollowState::default(),
            status_width: 0,
        }
    }

    /// Consume every complete line already present in the source.
    ///
    /// Sources that cannot seek (pipes, terminals) are rejected before a
    /// single byte is read. The date range is applied once to the whole
    /// initial batch.
    pub fn prime(&mut self) -> Result<u64> {
        self.ensure_seekable()?;

        let mut timestamps: Vec<NaiveDateTime> = Vec::new();
        while let Some(line) = self.poll_line()? {
            if let Some(ts) = LogParser::parse_timestamp(&line) {
                timestamps.push(ts);
            }
        }

        for ts in filter_by_date(timestamps, &self.range) {
            self.state.series.record(ts);
            self.state.accepted += 1;
        }

        self.state.cursor = self
            .reader
            .stream_position()
            .map_err(RpsError::NotSeekable)?;

        tracing::debug!(
            accepted = self.state.accepted,
            offset = self.state.cursor,
            "priming complete"
        );
        Ok(self.state.accepted)
    }

    /// Try to read the next complete line.
    ///
    /// Returns `None` when the source is currently exhausted. A line without
    /// its newline is kept in the pending buffer and completed by a later
    /// call, so it is only ever handed out once.
    pub fn poll_line(&mut self) -> std::io::Result<Option<String>> {
        let n = self.reader.read_until(b'\n', &mut self.state.pending)?;
        self.state.cursor += n as u64;

        if self.state.pending.last() != Some(&b'\n') {
            return Ok(None);
        }

        let raw = std::mem::take(&mut self.state.pending);
        Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
    }

    /// Parse `line` and, if it is inside the date range, count it.
    ///
    /// Returns the most recent second of the series and its count when the
    /// line was accepted.
    pub fn ingest_line(&mut self, line: &str) -> Option<(NaiveDateTime, u64)> {
        let ts = LogParser::parse_timestamp(line)?;
        if !self.range.contains(ts) {
            return None;
        }
        self.state.series.record(ts);
        self.state.accepted += 1;
        self.state.series.latest()
    }

    /// Current running state.
    pub fn state(&self) -> &FollowState {
        &self.state
    }

    /// Run the full follow session, writing progress to `out`.
    ///
    /// Primes, prints the initial summary, then watches for new lines until
    /// `shutdown` becomes `true`. On shutdown a still-incomplete final line
    /// is parsed once, and the complete report is printed.
    pub async fn run<W: Write>(
        mut self,
        out: &mut W,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<FollowSummary> {
        self.ensure_seekable()?;

        writeln!(out, "Following log file... (Ctrl+C to stop)")?;
        writeln!(out, "{}", RULE)?;

        self.prime()?;
        writeln!(
            out,
            "{}",
            initial_summary_line(self.state.accepted, &self.state.series)
        )?;
        writeln!(out, "{}", RULE)?;
        out.flush()?;

        tracing::info!(offset = self.state.cursor, "watching for new lines");

        let mut signal_closed = false;
        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.poll_line()? {
                Some(line) => {
                    if let Some((ts, count)) = self.ingest_line(&line) {
                        self.write_status(out, &format_series_entry(ts, count))?;
                    }
                    // Let the signal task run while lines keep arriving.
                    tokio::task::yield_now().await;
                }
                None => {
                    tokio::select! {
                        changed = shutdown.changed(), if !signal_closed => {
                            if changed.is_err() {
                                // Sender dropped: nobody can stop us any more,
                                // fall back to plain polling.
                                signal_closed = true;
                            }
                        }
                        _ = time::sleep(self.poll_interval) => {}
                    }
                }
            }
        }

        tracing::info!(accepted = self.state.accepted, "follow stopped");
        self.finish(out)
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn ensure_seekable(&mut self) -> Result<u64> {
        self.reader.stream_position().map_err(RpsError::NotSeekable)
    }

    /// Overwrite the previous status line in place.
    fn write_status<W: Write>(&mut self, out: &mut W, text: &str) -> std::io::Result<()> {
        let width = self.status_width.max(text.len());
        write!(out, "\r{:<width$}", text, width = width)?;
        out.flush()?;
        self.status_width = text.len();
        Ok(())
    }

    /// Terminating state: account for a trailing fragment and print the report.
    fn finish<W: Write>(mut self, out: &mut W) -> Result<FollowSummary> {
        if !self.state.pending.is_empty() {
            let raw = std::mem::take(&mut self.state.pending);
            self.ingest_line(&String::from_utf8_lossy(&raw));
        }

        writeln!(out)?;
        writeln!(out)?;
        writeln!(out, "Stopped following log file.")?;
        for line in report_lines(&self.state.series) {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;

        let stats = RpsStats::from_series(&self.state.series);
        Ok(FollowSummary {
            series: self.state.series,
            stats,
            accepted: self.state.accepted,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
