// Wire model for the graph endpoint.
//
// The endpoint answers with column-oriented arrays: one timestamp column
// and four value columns of the same length, plus a display label.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One timestamp as sent by the endpoint.
///
/// Monitoring backends emit either epoch-like numbers or formatted
/// strings (`"2024-06-15 10:30:00"`); both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Number(f64),
    Text(String),
}

impl fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Graph payload for one router.
///
/// `qst`/`dst` are the observed statistics, `ucl_q`/`ucl_d` the computed
/// upper control limits. Every column is expected to be as long as `ts`;
/// the core crate enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    pub ts: Vec<RawTimestamp>,
    #[serde(rename = "Qst")]
    pub qst: Vec<f64>,
    #[serde(rename = "Dst")]
    pub dst: Vec<f64>,
    #[serde(rename = "UCLq")]
    pub ucl_q: Vec<f64>,
    #[serde(rename = "UCLd")]
    pub ucl_d: Vec<f64>,
    pub sid: String,
}
