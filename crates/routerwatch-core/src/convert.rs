// ── Wire → domain conversion ──
//
// Turns a `GraphPayload` into a validated `Series`. Column lengths must
// agree with the timestamp column; anything else is a malformed series and
// goes down the same path as a transport failure.

use chrono::{DateTime, NaiveDateTime};

use routerwatch_api::{GraphPayload, RawTimestamp};

use crate::error::CoreError;
use crate::model::{RouterId, Series};

/// Text timestamp layouts accepted, tried in order.
const TEXT_LAYOUTS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y%m%d%H%M"];

/// Validate a payload and convert it into a [`Series`].
pub fn series_from_payload(router: &RouterId, payload: GraphPayload) -> Result<Series, CoreError> {
    let expected = payload.ts.len();
    let columns = [
        ("Qst", payload.qst.len()),
        ("Dst", payload.dst.len()),
        ("UCLq", payload.ucl_q.len()),
        ("UCLd", payload.ucl_d.len()),
    ];
    if let Some((name, len)) = columns.iter().find(|(_, len)| *len != expected) {
        return Err(CoreError::MalformedSeries {
            router: router.to_string(),
            reason: format!("column {name} has {len} values, ts has {expected}"),
        });
    }

    let x_labels = payload.ts.iter().map(ToString::to_string).collect();
    let x = payload
        .ts
        .iter()
        .enumerate()
        .map(|(idx, ts)| timestamp_to_x(ts, idx))
        .collect();

    let label = if payload.sid.trim().is_empty() {
        router.to_string()
    } else {
        payload.sid
    };

    Ok(Series {
        label,
        x,
        x_labels,
        q_stat: payload.qst,
        d_stat: payload.dst,
        q_limit: payload.ucl_q,
        d_limit: payload.ucl_d,
    })
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn timestamp_to_x(ts: &RawTimestamp, idx: usize) -> f64 {
    match ts {
        RawTimestamp::Number(n) => *n,
        RawTimestamp::Text(text) => parse_text_timestamp(text).unwrap_or(idx as f64),
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn parse_text_timestamp(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp() as f64);
    }
    TEXT_LAYOUTS.iter().find_map(|layout| {
        NaiveDateTime::parse_from_str(text, layout)
            .ok()
            .map(|naive| naive.and_utc().timestamp() as f64)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn router() -> RouterId {
        RouterId::new("R1").unwrap()
    }

    fn payload(ts: Vec<RawTimestamp>, n: usize) -> GraphPayload {
        GraphPayload {
            ts,
            qst: vec![1.0; n],
            dst: vec![2.0; n],
            ucl_q: vec![3.0; n],
            ucl_d: vec![4.0; n],
            sid: "R1".into(),
        }
    }

    #[test]
    fn numeric_timestamps_pass_through() {
        let ts = vec![RawTimestamp::Number(1.0), RawTimestamp::Number(2.0)];
        let series = series_from_payload(&router(), payload(ts, 2)).unwrap();
        assert_eq!(series.x, vec![1.0, 2.0]);
        assert_eq!(series.x_labels, vec!["1".to_owned(), "2".to_owned()]);
        assert_eq!(series.label, "R1");
    }

    #[test]
    fn text_timestamps_become_epoch_seconds() {
        let ts = vec![
            RawTimestamp::Text("1970-01-01 00:01:00".into()),
            RawTimestamp::Text("1970-01-01T00:02:00".into()),
        ];
        let series = series_from_payload(&router(), payload(ts, 2)).unwrap();
        assert_eq!(series.x, vec![60.0, 120.0]);
        assert_eq!(series.x_labels[0], "1970-01-01 00:01:00");
    }

    #[test]
    fn unparseable_text_falls_back_to_index() {
        let ts = vec![
            RawTimestamp::Text("yesterday".into()),
            RawTimestamp::Text("today".into()),
        ];
        let series = series_from_payload(&router(), payload(ts, 2)).unwrap();
        assert_eq!(series.x, vec![0.0, 1.0]);
    }

    #[test]
    fn misaligned_columns_are_rejected() {
        let mut p = payload(vec![RawTimestamp::Number(1.0)], 1);
        p.ucl_d.push(9.0);
        let err = series_from_payload(&router(), p).unwrap_err();
        match err {
            CoreError::MalformedSeries { router, reason } => {
                assert_eq!(router, "R1");
                assert!(reason.contains("UCLd"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_sid_falls_back_to_router() {
        let mut p = payload(vec![RawTimestamp::Number(1.0)], 1);
        p.sid = "  ".into();
        let series = series_from_payload(&router(), p).unwrap();
        assert_eq!(series.label, "R1");
    }

    #[test]
    fn empty_payload_is_valid() {
        let series = series_from_payload(&router(), payload(Vec::new(), 0)).unwrap();
        assert!(series.is_empty());
    }
}
