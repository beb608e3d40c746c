//! Common/Combined Log Format line parsing.
//!
//! Only the leading `<ip> <ident> <user> [<timestamp>] "<request>" <status>
//! <size>` fields are recognised; referer, user agent and anything else after
//! the size field is ignored.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use rps_core::models::LogRecord;
use rps_core::time_utils::parse_clf_timestamp;

/// Structural pattern of the CLF prefix, anchored at the start of the line.
const CLF_PATTERN: &str = r#"^(\S+) (\S+) (\S+) \[([^\]]+)\] "([^"]+)" (\d+) (\S+)"#;

fn clf_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CLF_PATTERN).expect("CLF pattern is valid"))
}

/// Stateless parser for access-log lines.
pub struct LogParser;

impl LogParser {
    /// Parse one raw line into a [`LogRecord`].
    ///
    /// Leading and trailing whitespace is ignored. Returns `None` when the
    /// line does not have the CLF structure, when the bracketed date/time
    /// token is not `dd/Mon/yyyy:HH:MM:SS`, or when the status code does not
    /// fit a `u16`.
    ///
    /// The status check is stricter than the structural pattern: an
    /// all-digit status such as `9999999` matches `(\d+)` but still drops
    /// the line, so it is not counted.
    pub fn parse_line(line: &str) -> Option<LogRecord> {
        let caps = clf_regex().captures(line.trim())?;

        let mut stamp = caps[4].split_whitespace();
        let timestamp = parse_clf_timestamp(stamp.next()?)?;
        let utc_offset = stamp.next().map(str::to_string);

        let status = caps[6].parse::<u16>().ok()?;
        let bytes = caps[7].parse::<u64>().ok();

        Some(LogRecord {
            client: caps[1].to_string(),
            ident: caps[2].to_string(),
            user: caps[3].to_string(),
            timestamp,
            utc_offset,
            request: caps[5].to_string(),
            status,
            bytes,
        })
    }

    /// Extract only the request timestamp from `line`.
    pub fn parse_timestamp(line: &str) -> Option<NaiveDateTime> {
        Self::parse_line(line).map(|record| record.timestamp)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
