//! Single-instance ping chart adapter.
//!
//! The dashboard keeps at most one live chart model at a time: every
//! rebuild drops the previous model before constructing a replacement,
//! the same teardown-before-create discipline the countdown engine
//! applies to timers. An empty series leaves the panel blank instead of
//! erroring.

use ratatui::layout::Rect;
use ratatui::style::{Style, Stylize};
use ratatui::symbols;
use ratatui::text::Line;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};
use ratatui::Frame;

use vigil_core::HistoryPoint;

use crate::theme::Theme;

/// Prepared chart data for one render.
#[derive(Debug, Clone, PartialEq)]
struct ChartModel {
    points: Vec<(f64, f64)>,
    first_label: String,
    last_label: String,
    y_max: f64,
}

/// Holder of the single live chart instance.
#[derive(Debug, Default)]
pub struct PingChart {
    model: Option<ChartModel>,
}

impl PingChart {
    /// Create an empty chart adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the chart model from a history series (oldest first).
    ///
    /// The prior model is dropped first; an empty series leaves the
    /// panel blank.
    pub fn rebuild(&mut self, series: &[HistoryPoint]) {
        self.model = None;

        if series.is_empty() {
            return;
        }

        let points: Vec<(f64, f64)> = series
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, f64::from(p.ping_ms)))
            .collect();

        let y_max = points
            .iter()
            .map(|&(_, y)| y)
            .fold(0.0_f64, f64::max)
            .max(1.0);

        self.model = Some(ChartModel {
            points,
            first_label: series.first().map(|p| p.label.clone()).unwrap_or_default(),
            last_label: series.last().map(|p| p.label.clone()).unwrap_or_default(),
            y_max,
        });
    }

    /// Whether a chart instance is currently live.
    pub fn is_live(&self) -> bool {
        self.model.is_some()
    }

    /// Render the chart (or a blank panel) into `area`.
    pub fn draw(&self, frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_dim))
            .title(" Ping (ms) ");

        let Some(model) = &self.model else {
            frame.render_widget(block, area);
            return;
        };

        let dataset = Dataset::default()
            .name("ping")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.accent))
            .data(&model.points);

        let x_max = (model.points.len().saturating_sub(1) as f64).max(1.0);
        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels(vec![
                        Line::from(model.first_label.clone()).fg(theme.text_dim),
                        Line::from(model.last_label.clone()).fg(theme.text_dim),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, model.y_max])
                    .labels(vec![
                        Line::from("0").fg(theme.text_dim),
                        Line::from(format!("{:.0}", model.y_max)).fg(theme.text_dim),
                    ]),
            );

        frame.render_widget(chart, area);
    }
}
