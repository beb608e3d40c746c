use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Date format accepted by `--fromdate` / `--todate`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp layout used inside the bracketed CLF field, without the offset.
pub const CLF_TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// Layout used when printing a per-second bucket.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Second-level bucketing ─────────────────────────────────────────────────────

/// Drop any sub-second component from `ts`.
pub fn truncate_to_second(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}

// ── Day boundaries ─────────────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` string into a calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59 on `date`.
///
/// Bounds are compared against whole-second timestamps, so this keeps every
/// bucket of the day.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// Parse the date/time token of a CLF timestamp field, e.g.
/// `07/Nov/2025:22:06:24`.
///
/// A seconds field of `60` is rejected; chrono would read it as a leap
/// second and it would land in the `:59` bucket.
pub fn parse_clf_timestamp(token: &str) -> Option<NaiveDateTime> {
    let ts = NaiveDateTime::parse_from_str(token, CLF_TIMESTAMP_FORMAT).ok()?;
    (ts.nanosecond() < 1_000_000_000).then_some(ts)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
