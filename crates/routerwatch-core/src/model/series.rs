/// One router's time series, validated and ready to chart.
///
/// All columns have the same length as `x`. `x` holds seconds since the
/// Unix epoch when the endpoint sent parseable timestamps, otherwise the
/// raw numeric value (or the sample index as a last resort).
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub x: Vec<f64>,
    /// Original timestamp text, kept for axis labels.
    pub x_labels: Vec<String>,
    pub q_stat: Vec<f64>,
    pub d_stat: Vec<f64>,
    pub q_limit: Vec<f64>,
    pub d_limit: Vec<f64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
