use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::time_utils::truncate_to_second;

/// One access-log line in Common/Combined Log Format, after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Client address token (first field). Never validated as an IP.
    pub client: String,
    /// RFC 1413 identity, usually `-`.
    pub ident: String,
    /// Authenticated user, usually `-`.
    pub user: String,
    /// Local wall-clock time of the request, as written in the log.
    pub timestamp: NaiveDateTime,
    /// Raw UTC offset suffix such as `+0000`. Kept for reference only; it is
    /// never applied to `timestamp`.
    #[serde(default)]
    pub utc_offset: Option<String>,
    /// Request line between the quotes, e.g. `GET / HTTP/1.1`.
    pub request: String,
    /// HTTP status code.
    pub status: u16,
    /// Response size in bytes; `None` when logged as `-`.
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// A single `(second, count)` pair of a [`CountSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub count: u64,
}

// ── CountSeries ───────────────────────────────────────────────────────────────

/// Sparse, time-ordered table of per-second request counts.
///
/// Keys are whole seconds and strictly increasing. Seconds without requests
/// have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountSeries {
    buckets: BTreeMap<NaiveDateTime, u64>,
}

impl CountSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request at `ts`, truncated to the second.
    ///
    /// Returns the updated count of the affected bucket.
    pub fn record(&mut self, ts: NaiveDateTime) -> u64 {
        let slot = self.buckets.entry(truncate_to_second(ts)).or_insert(0);
        *slot += 1;
        *slot
    }

    /// Count for the bucket containing `ts`, or zero.
    pub fn get(&self, ts: NaiveDateTime) -> u64 {
        self.buckets
            .get(&truncate_to_second(ts))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct observed seconds.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all bucket counts.
    pub fn total(&self) -> u64 {
        self.buckets.values().sum()
    }

    /// Iterate over `(second, count)` in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, u64)> + '_ {
        self.buckets.iter().map(|(ts, count)| (*ts, *count))
    }

    /// The earliest observed second.
    pub fn first(&self) -> Option<(NaiveDateTime, u64)> {
        self.buckets.first_key_value().map(|(ts, c)| (*ts, *c))
    }

    /// The most recent observed second.
    pub fn latest(&self) -> Option<(NaiveDateTime, u64)> {
        self.buckets.last_key_value().map(|(ts, c)| (*ts, *c))
    }

    /// Owned copy of the series as a list of points.
    pub fn points(&self) -> Vec<SeriesPoint> {
        self.iter()
            .map(|(timestamp, count)| SeriesPoint { timestamp, count })
            .collect()
    }
}

impl FromIterator<NaiveDateTime> for CountSeries {
    fn from_iter<I: IntoIterator<Item = NaiveDateTime>>(iter: I) -> Self {
        let mut series = CountSeries::new();
        for ts in iter {
            series.record(ts);
        }
        series
    }
}

// ── RpsStats ──────────────────────────────────────────────────────────────────

/// Summary statistics over a non-empty [`CountSeries`].
///
/// Averages and minima only consider observed seconds; idle seconds are not
/// part of the denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpsStats {
    /// Sum of all per-second counts.
    pub total_requests: u64,
    /// Number of distinct seconds with at least one request.
    pub observed_seconds: usize,
    /// `total_requests / observed_seconds`.
    pub average: f64,
    /// Busiest second.
    pub max: u64,
    /// Quietest observed second.
    pub min: u64,
    /// First observed second.
    pub first: NaiveDateTime,
    /// Last observed second.
    pub last: NaiveDateTime,
}

impl RpsStats {
    /// Compute statistics for `series`, or `None` when it is empty.
    pub fn from_series(series: &CountSeries) -> Option<Self> {
        let (first, _) = series.first()?;
        let (last, _) = series.latest()?;

        let mut total_requests = 0u64;
        let mut max = 0u64;
        let mut min = u64::MAX;
        for (_, count) in series.iter() {
            total_requests += count;
            max = max.max(count);
            min = min.min(count);
        }

        let observed_seconds = series.len();
        Some(Self {
            total_requests,
            observed_seconds,
            average: total_requests as f64 / observed_seconds as f64,
            max,
            min,
            first,
            last,
        })
    }
}
