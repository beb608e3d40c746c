//! Per-second request aggregation.

use chrono::NaiveDateTime;

use rps_core::models::{CountSeries, RpsStats};

/// Stateless helper that folds timestamps into a [`CountSeries`].
pub struct RequestAggregator;

impl RequestAggregator {
    /// Bucket `timestamps` by whole second.
    ///
    /// Order of the input does not matter; the result is sorted by second and
    /// its counts sum to `timestamps.len()`.
    pub fn aggregate(timestamps: &[NaiveDateTime]) -> CountSeries {
        timestamps.iter().copied().collect()
    }

    /// Statistics over `series`; `None` when there is nothing to summarise.
    pub fn calculate_stats(series: &CountSeries) -> Option<RpsStats> {
        RpsStats::from_series(series)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
