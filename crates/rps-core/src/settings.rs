use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, RpsError};

/// Log file analysed when none is given on the command line.
pub const DEFAULT_LOG_FILE: &str = "/var/log/apache2/access.log";

/// Chart destination used when `--plot` is passed without a value.
pub const DEFAULT_PLOT_FILE: &str = "requests_per_second.txt";

/// Pause between reads of a followed file that has no new data.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Positional value that selects standard input.
pub const STDIN_MARKER: &str = "-";

const EXAMPLES: &str = "\
Examples:
  # Analyze the default log file
  rps-monitor

  # Follow a log file in real-time
  rps-monitor -f /var/log/apache2/access.log

  # Render a chart to requests_per_second.txt
  rps-monitor --plot /var/log/apache2/access.log

  # Read from stdin and filter by date
  zcat /var/log/apache2/*access.log* | rps-monitor - --fromdate 2025-11-01

  # Analyze specific requests
  zcat /var/log/apache2/*access.log* | grep wp-login | rps-monitor - --todate 2025-11-30";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Requests-per-second analysis for web server access logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "rps-monitor",
    about = "Requests-per-second analysis for web server access logs",
    version,
    after_help = EXAMPLES
)]
pub struct Settings {
    /// Access log to analyze (use - for stdin)
    #[arg(default_value = DEFAULT_LOG_FILE, env = "RPS_LOG_FILE")]
    pub logfile: String,

    /// Follow the log file in real-time (like tail -f)
    #[arg(short = 'f', long)]
    pub follow: bool,

    /// Render a chart instead of printing the listing (optional output path)
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_PLOT_FILE
    )]
    pub plot: Option<PathBuf>,

    /// Show the chart in the terminal instead of printing the listing
    #[arg(long)]
    pub interactive: bool,

    /// Print the series and statistics as JSON
    #[arg(long, conflicts_with_all = ["plot", "interactive"])]
    pub json: bool,

    /// Filter logs from this date (format: YYYY-MM-DD)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub fromdate: Option<String>,

    /// Filter logs to this date, inclusive (format: YYYY-MM-DD)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub todate: Option<String>,

    /// Delay between reads when a followed file has no new data (milliseconds)
    #[arg(
        long,
        default_value_t = DEFAULT_POLL_INTERVAL_MS,
        env = "RPS_POLL_INTERVAL_MS",
        value_parser = clap::value_parser!(u64).range(10..=5000)
    )]
    pub poll_interval_ms: u64,

    /// Chart theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Resolved modes ─────────────────────────────────────────────────────────────

/// Where log lines are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    Stdin,
    File(PathBuf),
}

/// How a finished batch analysis is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    /// Per-second listing plus statistics on stdout.
    Text,
    /// Pretty-printed JSON document on stdout.
    Json,
    /// Chart persisted to the given path.
    Plot(PathBuf),
    /// Chart shown in the terminal until the user quits.
    Interactive,
}

/// What the invocation will actually do once mode rules are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Batch(ReportTarget),
    Follow,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply `--debug`.
    pub fn load() -> Self {
        Self::load_from(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The input selected by the positional argument.
    pub fn source(&self) -> LogSource {
        if self.logfile == STDIN_MARKER {
            LogSource::Stdin
        } else {
            LogSource::File(PathBuf::from(&self.logfile))
        }
    }

    /// Resolve the flags into a [`RunMode`].
    ///
    /// Following standard input is rejected. Following while a chart, or JSON,
    /// was also requested keeps following and drops the other output with a
    /// single warning.
    pub fn run_mode(&self) -> Result<RunMode> {
        if self.follow {
            if self.source() == LogSource::Stdin {
                return Err(RpsError::FollowRequiresFile);
            }
            if self.plot.is_some() || self.interactive {
                tracing::warn!("--follow cannot be combined with plotting; chart output is skipped");
            } else if self.json {
                tracing::warn!("--follow cannot be combined with --json; printing text summary");
            }
            return Ok(RunMode::Follow);
        }

        let target = if let Some(path) = &self.plot {
            ReportTarget::Plot(path.clone())
        } else if self.interactive {
            ReportTarget::Interactive
        } else if self.json {
            ReportTarget::Json
        } else {
            ReportTarget::Text
        };
        Ok(RunMode::Batch(target))
    }

    /// Pause between empty reads in follow mode.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
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

    fn settings(args: &[&str]) -> Settings {
        let mut full = vec!["rps-monitor"];
        full.extend_from_slice(args);
        Settings::load_from(full)
    }

    #[test]
    fn test_settings_default_values() {
        // RPS_LOG_FILE / RPS_POLL_INTERVAL_MS may leak in from the developer's
        // shell; only assert on them when unset.
        let s = settings(&[]);
        if std::env::var_os("RPS_LOG_FILE").is_none() {
            assert_eq!(s.logfile, DEFAULT_LOG_FILE);
        }
        if std::env::var_os("RPS_POLL_INTERVAL_MS").is_none() {
            assert_eq!(s.poll_interval(), Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
        }
        assert!(!s.follow);
        assert!(s.plot.is_none());
        assert!(!s.interactive);
        assert!(!s.json);
        assert!(s.fromdate.is_none());
        assert!(s.todate.is_none());
        assert_eq!(s.theme, "auto");
        assert_eq!(s.log_level, "WARNING");
    }

    #[test]
    fn test_settings_stdin_marker() {
        let s = settings(&["-"]);
        assert_eq!(s.source(), LogSource::Stdin);
    }

    #[test]
    fn test_settings_file_source() {
        let s = settings(&["/tmp/access.log"]);
        assert_eq!(s.source(), LogSource::File(PathBuf::from("/tmp/access.log")));
    }

    #[test]
    fn test_plot_flag_without_value_uses_default_path() {
        let s = settings(&["--plot", "/tmp/access.log"]);
        assert_eq!(s.plot, Some(PathBuf::from(DEFAULT_PLOT_FILE)));
        assert_eq!(s.logfile, "/tmp/access.log");
        assert_eq!(
            s.run_mode().unwrap(),
            RunMode::Batch(ReportTarget::Plot(PathBuf::from(DEFAULT_PLOT_FILE)))
        );
    }

    #[test]
    fn test_plot_flag_with_value() {
        let s = settings(&["--plot=/tmp/chart.txt", "/tmp/access.log"]);
        assert_eq!(s.plot, Some(PathBuf::from("/tmp/chart.txt")));
    }

    #[test]
    fn test_date_flags() {
        let s = settings(&["--fromdate", "2025-11-01", "--todate", "2025-11-30"]);
        assert_eq!(s.fromdate.as_deref(), Some("2025-11-01"));
        assert_eq!(s.todate.as_deref(), Some("2025-11-30"));
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let s = settings(&["--debug"]);
        assert_eq!(s.log_level, "DEBUG");
    }

    #[test]
    fn test_run_mode_follow_with_stdin_rejected() {
        let s = settings(&["-f", "-"]);
        assert!(matches!(s.run_mode(), Err(RpsError::FollowRequiresFile)));
    }

    #[test]
    fn test_run_mode_follow_wins_over_plot() {
        let s = settings(&["-f", "--plot", "/tmp/access.log"]);
        let (mode, logged) = capture_logs(tracing::Level::WARN, || s.run_mode());
        assert_eq!(mode.unwrap(), RunMode::Follow);
        assert_eq!(logged.matches("WARN").count(), 1);
        assert_eq!(
            logged.matches("--follow cannot be combined with plotting").count(),
            1
        );
    }

    #[test]
    fn test_run_mode_follow_with_json_warns_once() {
        let s = settings(&["-f", "--json", "/tmp/access.log"]);
        let (mode, logged) = capture_logs(tracing::Level::WARN, || s.run_mode());
        assert_eq!(mode.unwrap(), RunMode::Follow);
        assert_eq!(logged.matches("--follow cannot be combined with --json").count(), 1);
    }

    #[test]
    fn test_run_mode_plain_follow_is_silent() {
        let s = settings(&["-f", "/tmp/access.log"]);
        let (mode, logged) = capture_logs(tracing::Level::TRACE, || s.run_mode());
        assert_eq!(mode.unwrap(), RunMode::Follow);
        assert!(logged.is_empty());
    }

    #[test]
    fn test_run_mode_batch_targets() {
        assert_eq!(
            settings(&["x.log"]).run_mode().unwrap(),
            RunMode::Batch(ReportTarget::Text)
        );
        assert_eq!(
            settings(&["--json", "x.log"]).run_mode().unwrap(),
            RunMode::Batch(ReportTarget::Json)
        );
        assert_eq!(
            settings(&["--interactive", "x.log"]).run_mode().unwrap(),
            RunMode::Batch(ReportTarget::Interactive)
        );
    }

    #[test]
    fn test_json_conflicts_with_plot() {
        let result = Settings::try_parse_from(["rps-monitor", "--json", "--plot", "x.log"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_poll_interval_range_enforced() {
        let result = Settings::try_parse_from(["rps-monitor", "--poll-interval-ms", "1"]);
        assert!(result.is_err());
        let s = settings(&["--poll-interval-ms", "250"]);
        assert_eq!(s.poll_interval(), Duration::from_millis(250));
    }
}
