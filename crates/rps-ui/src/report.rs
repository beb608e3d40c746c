//! Presentation of a finished analysis.
//!
//! The [`Reporter`] is the hand-off point between the pipeline and the
//! outside world: it prints the listing, emits JSON, or passes the series to
//! the chart renderer, depending on the requested [`ReportTarget`].

use std::io::Write;

use serde::Serialize;

use rps_core::error::Result;
use rps_core::formatting::report_lines;
use rps_core::models::{RpsStats, SeriesPoint};
use rps_core::settings::ReportTarget;
use rps_data::analysis::{AnalysisMetadata, AnalysisResult};

use crate::app::ChartApp;
use crate::chart::{save_chart, ChartData};
use crate::themes::Theme;

/// Printed instead of a chart when the series is empty.
pub const NO_PLOT_DATA: &str = "No data to plot";

/// Machine-readable form of an [`AnalysisResult`].
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub series: Vec<SeriesPoint>,
    pub stats: Option<&'a RpsStats>,
    pub metadata: &'a AnalysisMetadata,
}

impl<'a> From<&'a AnalysisResult> for JsonReport<'a> {
    fn from(result: &'a AnalysisResult) -> Self {
        Self {
            series: result.series.points(),
            stats: result.stats.as_ref(),
            metadata: &result.metadata,
        }
    }
}

/// Sends an [`AnalysisResult`] to its destination.
pub struct Reporter {
    target: ReportTarget,
    theme_name: String,
}

impl Reporter {
    pub fn new(target: ReportTarget, theme_name: impl Into<String>) -> Self {
        Self {
            target,
            theme_name: theme_name.into(),
        }
    }

    /// Present `result`; textual output goes to `out`.
    pub fn report<W: Write>(&self, result: &AnalysisResult, out: &mut W) -> Result<()> {
        match &self.target {
            ReportTarget::Text => {
                for line in report_lines(&result.series) {
                    writeln!(out, "{}", line)?;
                }
            }
            ReportTarget::Json => {
                let json = serde_json::to_string_pretty(&JsonReport::from(result))?;
                writeln!(out, "{}", json)?;
            }
            ReportTarget::Plot(path) => {
                let theme = Theme::from_name(&self.theme_name);
                if save_chart(&result.series, path, &theme)? {
                    writeln!(out, "Plot saved to {}", path.display())?;
                } else {
                    writeln!(out, "{}", NO_PLOT_DATA)?;
                }
            }
            ReportTarget::Interactive => match ChartData::from_series(&result.series) {
                Some(data) => ChartApp::new(&self.theme_name, data).run()?,
                None => writeln!(out, "{}", NO_PLOT_DATA)?,
            },
        }
        out.flush()?;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
