//! Plain-text rendering of count series and statistics.
//!
//! Everything here returns `String`s; callers decide where they are written.

use chrono::NaiveDateTime;

use crate::models::{CountSeries, RpsStats};
use crate::time_utils::DISPLAY_FORMAT;

/// Horizontal rule framing the per-second listing.
pub const RULE: &str = "--------------------------------------------------";

/// Message printed instead of a report when nothing survived filtering.
pub const NO_DATA: &str = "No data to display";

/// Format a bucket key as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}

/// Format a requests-per-second value with two decimals.
///
/// # Examples
///
/// ```
/// use rps_core::formatting::format_rate;
///
/// assert_eq!(format_rate(1.5), "1.50");
/// assert_eq!(format_rate(0.0), "0.00");
/// assert_eq!(format_rate(2.0 / 3.0), "0.67");
/// ```
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}", rate)
}

/// One line of the per-second listing: `2025-11-07 22:06:24: 2 req/s`.
pub fn format_series_entry(ts: NaiveDateTime, count: u64) -> String {
    format!("{}: {} req/s", format_timestamp(ts), count)
}

/// Trailer lines summarising `stats`.
pub fn stats_lines(stats: &RpsStats) -> Vec<String> {
    vec![
        format!("Total requests: {}", stats.total_requests),
        format!("Average RPS: {}", format_rate(stats.average)),
        format!("Max RPS: {}", stats.max),
        format!("Min RPS: {}", stats.min),
    ]
}

/// Full textual report for `series`.
///
/// An empty series produces the single line [`NO_DATA`].
pub fn report_lines(series: &CountSeries) -> Vec<String> {
    let Some(stats) = RpsStats::from_series(series) else {
        return vec![NO_DATA.to_string()];
    };

    let mut lines = Vec::with_capacity(series.len() + 8);
    lines.push(String::new());
    lines.push("Requests Per Second:".to_string());
    lines.push(RULE.to_string());
    lines.extend(series.iter().map(|(ts, count)| format_series_entry(ts, count)));
    lines.push(RULE.to_string());
    lines.extend(stats_lines(&stats));
    lines
}

/// Summary printed once follow mode has consumed the existing file.
pub fn initial_summary_line(accepted: u64, series: &CountSeries) -> String {
    let average = RpsStats::from_series(series)
        .map(|s| s.average)
        .unwrap_or(0.0);
    format!(
        "Initial: {} requests, Avg RPS: {}",
        accepted,
        format_rate(average)
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────
