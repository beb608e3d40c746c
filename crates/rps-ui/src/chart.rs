//! Time-series chart of requests per second.
//!
//! The chart is drawn with ratatui widgets straight into a [`Buffer`], so the
//! same code serves the interactive terminal view and the text export.

use std::path::Path;

use chrono::NaiveDateTime;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget};

use rps_core::error::{Result, RpsError};
use rps_core::formatting::{format_rate, format_timestamp};
use rps_core::models::{CountSeries, RpsStats};

use crate::themes::Theme;

/// Size of the exported chart, in terminal cells.
pub const EXPORT_WIDTH: u16 = 120;
pub const EXPORT_HEIGHT: u16 = 32;

// ── ChartData ─────────────────────────────────────────────────────────────────

/// Chart-ready view of a non-empty [`CountSeries`].
///
/// X values are seconds since the first observed second; Y values are the
/// per-second counts.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    pub stats: RpsStats,
}

impl ChartData {
    /// Build chart data, or `None` for an empty series.
    pub fn from_series(series: &CountSeries) -> Option<Self> {
        let stats = RpsStats::from_series(series)?;
        let origin = stats.first;

        let points: Vec<(f64, f64)> = series
            .iter()
            .map(|(ts, count)| (offset_secs(origin, ts), count as f64))
            .collect();

        let span = offset_secs(origin, stats.last).max(1.0);
        let top = (stats.max as f64 * 1.1).ceil().max(1.0);

        let middle = origin + chrono::Duration::seconds((span / 2.0) as i64);
        let x_labels = vec![
            format_timestamp(origin),
            format_timestamp(middle),
            format_timestamp(stats.last),
        ];
        let y_labels = vec![
            "0".to_string(),
            format!("{:.0}", top / 2.0),
            format!("{:.0}", top),
        ];

        Some(Self {
            points,
            x_bounds: [0.0, span],
            y_bounds: [0.0, top],
            x_labels,
            y_labels,
            stats,
        })
    }
}

fn offset_secs(origin: NaiveDateTime, ts: NaiveDateTime) -> f64 {
    (ts - origin).num_seconds() as f64
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Draw the chart plus a one-line statistics footer into `buf`.
pub fn render_chart(area: Rect, buf: &mut Buffer, data: &ChartData, theme: &Theme) {
    let rows = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

    let dataset = Dataset::default()
        .name("req/s")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.series)
        .data(&data.points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(Span::styled(" Requests Per Second ", theme.title)),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled("Time", theme.axis_label))
                .style(theme.axis)
                .bounds(data.x_bounds)
                .labels(data.x_labels.clone()),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Requests Per Second", theme.axis_label))
                .style(theme.axis)
                .bounds(data.y_bounds)
                .labels(data.y_labels.clone()),
        );
    chart.render(rows[0], buf);

    let s = &data.stats;
    let footer = Line::from(vec![
        Span::styled(format!(" Total: {}", s.total_requests), theme.text),
        Span::styled("  |  ", theme.dim),
        Span::styled(format!("Avg: {}", format_rate(s.average)), theme.text),
        Span::styled("  |  ", theme.dim),
        Span::styled(format!("Max: {}", s.max), theme.text),
        Span::styled("  |  ", theme.dim),
        Span::styled(format!("Min: {}", s.min), theme.text),
    ]);
    Paragraph::new(footer).render(rows[1], buf);
}

/// Render the chart off-screen and return it as plain text lines.
pub fn render_to_string(data: &ChartData, theme: &Theme, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    render_chart(area, &mut buf, data, theme);

    let mut text = String::with_capacity(width as usize * height as usize);
    for y in 0..height {
        let mut row = String::with_capacity(width as usize);
        for x in 0..width {
            if let Some(cell) = buf.cell((x, y)) {
                row.push_str(cell.symbol());
            }
        }
        text.push_str(row.trim_end());
        text.push('\n');
    }
    text
}

/// Write the chart for `series` to `path`.
///
/// Returns `Ok(false)` without touching the file when there is nothing to
/// plot.
pub fn save_chart(series: &CountSeries, path: &Path, theme: &Theme) -> Result<bool> {
    let Some(data) = ChartData::from_series(series) else {
        return Ok(false);
    };

    let text = render_to_string(&data, theme, EXPORT_WIDTH, EXPORT_HEIGHT);
    std::fs::write(path, text).map_err(|e| {
        RpsError::Render(format!("cannot write chart to {}: {}", path.display(), e))
    })?;

    tracing::info!(path = %path.display(), points = data.points.len(), "chart saved");
    Ok(true)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
