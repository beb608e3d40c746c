//! Inclusive day-level date range filtering.

use chrono::NaiveDateTime;
use tracing::error;

use rps_core::time_utils::{end_of_day, parse_date, start_of_day};

/// Optional inclusive bounds on request timestamps.
///
/// `from` is midnight of the first day and `to` is 23:59:59 of the last day,
/// so both named days are kept whole. A range whose `from` lies after its
/// `to` matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateRange {
    /// A range with no bounds; every timestamp matches.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build a range from `YYYY-MM-DD` strings.
    ///
    /// A bound that fails to parse is dropped with a warning; the other bound
    /// still applies. Empty strings count as absent.
    pub fn from_bounds(fromdate: Option<&str>, todate: Option<&str>) -> Self {
        let from = fromdate
            .filter(|s| !s.is_empty())
            .and_then(|s| match parse_date(s) {
                Some(date) => Some(start_of_day(date)),
                None => {
                    error!("Invalid fromdate format: {}", s);
                    None
                }
            });

        let to = todate
            .filter(|s| !s.is_empty())
            .and_then(|s| match parse_date(s) {
                Some(date) => Some(end_of_day(date)),
                None => {
                    error!("Invalid todate format: {}", s);
                    None
                }
            });

        Self { from, to }
    }

    /// `true` when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether `ts` falls inside the range (bounds inclusive).
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.from.map_or(true, |from| ts >= from) && self.to.map_or(true, |to| ts <= to)
    }
}

/// Keep only the timestamps inside `range`, preserving their order.
pub fn filter_by_date(timestamps: Vec<NaiveDateTime>, range: &DateRange) -> Vec<NaiveDateTime> {
    if range.is_unbounded() {
        return timestamps;
    }
    timestamps
        .into_iter()
        .filter(|ts| range.contains(*ts))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    /// Run `f` with a scoped subscriber at `level` and return what it logged.
    fn capture_logs<T>(level: tracing::Level, f: impl FnOnce() -> T) -> (T, String) {
        #[derive(Clone, Default)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(level)
            .finish();

        let out = tracing::subscriber::with_default(subscriber, f);
        let logged = String::from_utf8_lossy(&capture.0.lock().unwrap()).into_owned();
        (out, logged)
    }

    fn dt(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn week() -> Vec<NaiveDateTime> {
        vec![
            dt(6, 23, 59, 59),
            dt(7, 0, 0, 0),
            dt(7, 22, 6, 24),
            dt(8, 23, 59, 59),
            dt(9, 0, 0, 0),
        ]
    }

    #[test]
    fn test_no_bounds_is_identity() {
        let range = DateRange::from_bounds(None, None);
        assert!(range.is_unbounded());
        assert_eq!(filter_by_date(week(), &range), week());
    }

    #[test]
    fn test_from_bound_is_inclusive_midnight() {
        let range = DateRange::from_bounds(Some("2025-11-07"), None);
        assert_eq!(range.from, Some(dt(7, 0, 0, 0)));
        let kept = filter_by_date(week(), &range);
        assert_eq!(kept.first(), Some(&dt(7, 0, 0, 0)));
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn test_to_bound_keeps_entire_day() {
        let range = DateRange::from_bounds(None, Some("2025-11-08"));
        assert_eq!(range.to, Some(dt(8, 23, 59, 59)));
        let kept = filter_by_date(week(), &range);
        assert_eq!(kept.last(), Some(&dt(8, 23, 59, 59)));
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn test_both_bounds() {
        let range = DateRange::from_bounds(Some("2025-11-07"), Some("2025-11-07"));
        assert_eq!(
            filter_by_date(week(), &range),
            vec![dt(7, 0, 0, 0), dt(7, 22, 6, 24)]
        );
    }

    #[test]
    fn test_inverted_bounds_yield_empty() {
        let range = DateRange::from_bounds(Some("2025-11-09"), Some("2025-11-06"));
        assert!(filter_by_date(week(), &range).is_empty());
    }

    #[test]
    fn test_invalid_bound_is_dropped() {
        let range = DateRange::from_bounds(Some("07/11/2025"), Some("2025-11-07"));
        assert!(range.from.is_none());
        assert_eq!(range.to, Some(dt(7, 23, 59, 59)));
        assert_eq!(filter_by_date(week(), &range).len(), 3);

        let range = DateRange::from_bounds(Some("nonsense"), Some("2025-02-30"));
        assert!(range.is_unbounded());
    }

    #[test]
    fn test_invalid_bound_is_reported_even_at_error_level() {
        let (range, logged) = capture_logs(tracing::Level::ERROR, || {
            DateRange::from_bounds(Some("07/11/2025"), Some("2025-13-01"))
        });
        assert!(range.is_unbounded());
        assert_eq!(logged.matches("Invalid fromdate format: 07/11/2025").count(), 1);
        assert_eq!(logged.matches("Invalid todate format: 2025-13-01").count(), 1);
    }

    #[test]
    fn test_valid_bounds_log_nothing() {
        let (_, logged) = capture_logs(tracing::Level::TRACE, || {
            DateRange::from_bounds(Some("2025-11-07"), Some("2025-11-08"))
        });
        assert!(logged.is_empty());
    }

    #[test]
    fn test_empty_string_is_absent() {
        assert!(DateRange::from_bounds(Some(""), Some("")).is_unbounded());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let range = DateRange::from_bounds(Some("2025-11-07"), Some("2025-11-08"));
        let once = filter_by_date(week(), &range);
        let twice = filter_by_date(once.clone(), &range);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fromdate_after_all_entries() {
        let range = DateRange::from_bounds(Some("2025-11-08"), None);
        let day_seven = vec![dt(7, 22, 6, 24), dt(7, 22, 6, 24), dt(7, 22, 6, 25)];
        assert!(filter_by_date(day_seven, &range).is_empty());
    }
}
