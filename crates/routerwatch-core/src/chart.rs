// ── Chart model ──
//
// Renderer-agnostic description of one panel chart: which traces to draw,
// how (markers or lines), and how the axes behave. UI crates turn a
// `ChartSpec` into widgets; nothing here knows about terminals.

use std::sync::Arc;

use crate::model::Series;

/// How a trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMode {
    /// Discrete points (observed values).
    Markers,
    /// Connected line (computed limits).
    Lines,
}

/// Scale of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

/// One named series of `(x, y)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: &'static str,
    pub mode: TraceMode,
    pub points: Vec<(f64, f64)>,
}

/// Axis and title options.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub title: String,
    pub y_scale: AxisScale,
    /// Fit the y-axis to the data instead of fixed bounds.
    pub y_autorange: bool,
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub traces: Vec<Trace>,
    pub layout: ChartLayout,
    /// Original timestamp text for the first and last sample.
    pub x_span_labels: Option<(String, String)>,
}

impl ChartSpec {
    /// Build the standard four-trace chart for a router series.
    ///
    /// `Qst` and `Dst` are drawn as markers, `UCLq` and `UCLd` as lines, on a
    /// log-scaled, auto-ranged y-axis.
    pub fn from_series(series: &Series) -> Self {
        let zip = |ys: &[f64]| -> Vec<(f64, f64)> {
            series.x.iter().copied().zip(ys.iter().copied()).collect()
        };

        let traces = vec![
            Trace {
                name: "Qst",
                mode: TraceMode::Markers,
                points: zip(&series.q_stat),
            },
            Trace {
                name: "Dst",
                mode: TraceMode::Markers,
                points: zip(&series.d_stat),
            },
            Trace {
                name: "UCLq",
                mode: TraceMode::Lines,
                points: zip(&series.q_limit),
            },
            Trace {
                name: "UCLd",
                mode: TraceMode::Lines,
                points: zip(&series.d_limit),
            },
        ];

        let x_span_labels = match (series.x_labels.first(), series.x_labels.last()) {
            (Some(first), Some(last)) => Some((first.clone(), last.clone())),
            _ => None,
        };

        Self {
            traces,
            layout: ChartLayout {
                title: format!("{} graph", series.label),
                y_scale: AxisScale::Log,
                y_autorange: true,
            },
            x_span_labels,
        }
    }

    /// Wrap in an `Arc` for cheap sharing between the board and renderers.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// `[min, max]` of x across all traces, or `None` when there are no points.
    pub fn x_bounds(&self) -> Option<[f64; 2]> {
        bounds(self.traces.iter().flat_map(|t| t.points.iter().map(|&(x, _)| x)))
    }

    /// `[min, max]` of y in axis units.
    ///
    /// On a log axis the bounds are `log10` exponents rounded outward to whole
    /// decades, and non-positive values are ignored (they have no place on a
    /// log scale). Returns `None` when nothing is plottable.
    pub fn y_bounds(&self) -> Option<[f64; 2]> {
        let ys = self
            .traces
            .iter()
            .flat_map(|t| t.points.iter().map(|&(_, y)| y));

        match self.layout.y_scale {
            AxisScale::Linear => bounds(ys),
            AxisScale::Log => {
                let [lo, hi] = bounds(ys.filter(|y| *y > 0.0).map(f64::log10))?;
                let (lo, hi) = (lo.floor(), hi.ceil());
                Some(if (hi - lo).abs() < f64::EPSILON {
                    [lo, lo + 1.0]
                } else {
                    [lo, hi]
                })
            }
        }
    }

    /// Map a data value onto the y-axis, or `None` if it cannot be plotted.
    pub fn project_y(&self, y: f64) -> Option<f64> {
        match self.layout.y_scale {
            AxisScale::Linear => y.is_finite().then_some(y),
            AxisScale::Log => (y > 0.0 && y.is_finite()).then(|| y.log10()),
        }
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<[f64; 2]> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some([v, v]),
            Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
        })
}
