//! Draws a [`ChartSpec`] with ratatui's `Chart` widget.
//!
//! Marker traces become scatter dots, line traces Braille lines. On a log
//! axis every y value is projected to its `log10` before plotting and the
//! axis is labelled in decades.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, LegendPosition, Paragraph};

use routerwatch_core::{AxisScale, ChartSpec, TraceMode};

use crate::theme;

/// Render `spec` inside `block`.
pub fn render_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec, block: Block<'_>) {
    let (Some(x_bounds), Some(y_bounds)) = (spec.x_bounds(), spec.y_bounds()) else {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new("  No samples").style(theme::key_hint()),
            inner,
        );
        return;
    };

    let projected: Vec<Vec<(f64, f64)>> = spec
        .traces
        .iter()
        .map(|t| {
            t.points
                .iter()
                .filter_map(|&(x, y)| spec.project_y(y).map(|py| (x, py)))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset<'_>> = spec
        .traces
        .iter()
        .zip(&projected)
        .enumerate()
        .map(|(i, (trace, data))| {
            let (marker, graph_type) = match trace.mode {
                TraceMode::Markers => (Marker::Dot, GraphType::Scatter),
                TraceMode::Lines => (Marker::Braille, GraphType::Line),
            };
            Dataset::default()
                .name(trace.name)
                .marker(marker)
                .graph_type(graph_type)
                .style(Style::default().fg(theme::trace_color(i)))
                .data(data)
        })
        .collect();

    let x_labels = spec
        .x_span_labels
        .as_ref()
        .map(|(first, last)| vec![Span::raw(first.clone()), Span::raw(last.clone())])
        .unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(Some(LegendPosition::TopLeft))
        .x_axis(
            Axis::default()
                .bounds(x_bounds)
                .labels(x_labels)
                .style(theme::axis()),
        )
        .y_axis(
            Axis::default()
                .bounds(y_bounds)
                .labels(y_labels(spec.layout.y_scale, y_bounds))
                .style(theme::axis()),
        );

    frame.render_widget(chart, area);
}

/// Axis labels for the given bounds: one per decade on a log axis,
/// min / mid / max on a linear one.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn y_labels(scale: AxisScale, [lo, hi]: [f64; 2]) -> Vec<Span<'static>> {
    match scale {
        AxisScale::Log => {
            let (lo, hi) = (lo as i32, hi as i32);
            // keep at most ~6 labels so narrow panels stay readable
            let step = usize::try_from((hi - lo) / 6 + 1).unwrap_or(1);
            (lo..=hi)
                .step_by(step)
                .map(|exp| Span::raw(decade_label(exp)))
                .collect()
        }
        AxisScale::Linear => [lo, (lo + hi) / 2.0, hi]
            .into_iter()
            .map(|v| Span::raw(format!("{v:.1}")))
            .collect(),
    }
}

/// `10^exp` written out for small exponents, `1e<exp>` otherwise.
pub fn decade_label(exp: i32) -> String {
    match u32::try_from(exp) {
        Ok(e) if e <= 5 => 10_u32.pow(e).to_string(),
        _ => format!("1e{exp}"),
    }
}
