use std::io::{BufRead, BufReader};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rps_core::error::Result;
use rps_core::settings::LogSource;
use rps_data::reader::open_log_file;

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Translate a `--log-level` name into an `EnvFilter` directive.
///
/// The conventional names (`DEBUG`, `INFO`, `WARNING`, `ERROR`) map onto
/// tracing levels; anything else is passed through so `RUST_LOG` style
/// directives such as `rps_runtime=debug` also work.
pub fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Diagnostics go to stderr; stdout is reserved for the report.
pub fn setup_logging(log_level: &str) {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(layer).init();
}

// ── Input bootstrap ────────────────────────────────────────────────────────────

/// Open the batch input: locked stdin or a buffered file.
pub fn open_batch_input(source: &LogSource) -> Result<Box<dyn BufRead>> {
    match source {
        LogSource::Stdin => Ok(Box::new(std::io::stdin().lock())),
        LogSource::File(path) => Ok(Box::new(BufReader::new(open_log_file(path)?))),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rps_core::error::RpsError;
    use tempfile::TempDir;

    #[test]
    fn test_filter_directive_levels() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("info"), "info");
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("ERROR"), "error");
    }

    #[test]
    fn test_filter_directive_passes_through_directives() {
        assert_eq!(filter_directive("rps_runtime=debug"), "rps_runtime=debug");
    }

    #[test]
    fn test_open_batch_input_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("access.log");
        std::fs::write(&path, "first\nsecond\n").unwrap();

        let reader = open_batch_input(&LogSource::File(path)).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_open_batch_input_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.log");
        let err = open_batch_input(&LogSource::File(path)).err().unwrap();
        assert!(matches!(err, RpsError::LogFileNotFound(_)));
    }
}
