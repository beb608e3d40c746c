//! Batch analysis pipeline.
//!
//! Reads a finite source once, filters the collected timestamps by date,
//! aggregates them per second and returns an [`AnalysisResult`] ready for the
//! reporting layer.

use std::io::BufRead;
use std::time::Instant;

use chrono::{NaiveDateTime, Utc};
use rps_core::models::{CountSeries, RpsStats};
use tracing::debug;

use crate::aggregator::RequestAggregator;
use crate::filter::{filter_by_date, DateRange};
use crate::reader::read_timestamps;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Non-blank lines read from the source.
    pub lines_read: u64,
    /// Lines that produced a timestamp.
    pub lines_parsed: u64,
    /// Lines that did not match the log format.
    pub lines_skipped: u64,
    /// Parsed lines dropped by the date range.
    pub filtered_out: u64,
    /// Effective lower bound, if any.
    pub from: Option<NaiveDateTime>,
    /// Effective upper bound, if any.
    pub to: Option<NaiveDateTime>,
    /// Wall-clock seconds spent reading and aggregating.
    pub elapsed_seconds: f64,
}

/// The complete output of [`analyze_log`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Per-second counts after filtering.
    pub series: CountSeries,
    /// Summary statistics; `None` when the series is empty.
    pub stats: Option<RpsStats>,
    /// Metadata about this analysis run.
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// `true` when no request survived parsing and filtering.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the batch pipeline over `reader`.
///
/// 1. Parse every line, keeping accepted timestamps.
/// 2. Apply `range` once to the collected list.
/// 3. Aggregate into a per-second [`CountSeries`] and compute statistics.
pub fn analyze_log<R: BufRead>(reader: R, range: &DateRange) -> std::io::Result<AnalysisResult> {
    let started = Instant::now();

    let outcome = read_timestamps(reader)?;
    let lines_parsed = outcome.timestamps.len() as u64;

    let kept = filter_by_date(outcome.timestamps, range);
    let filtered_out = lines_parsed - kept.len() as u64;

    let series = RequestAggregator::aggregate(&kept);
    let stats = RequestAggregator::calculate_stats(&series);

    debug!(
        "Aggregated {} requests into {} seconds ({} filtered out)",
        kept.len(),
        series.len(),
        filtered_out
    );

    Ok(AnalysisResult {
        series,
        stats,
        metadata: AnalysisMetadata {
            generated_at: Utc::now().to_rfc3339(),
            lines_read: outcome.lines_read,
            lines_parsed,
            lines_skipped: outcome.lines_skipped,
            filtered_out,
            from: range.from,
            to: range.to,
            elapsed_seconds: started.elapsed().as_secs_f64(),
        },
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
