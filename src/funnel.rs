//! Funnel aggregation: per-stage counts and step-over-step conversion.

use serde::Serialize;
use serde_json::Value;

use crate::stage::StageMap;
use crate::store::{row_i64, Row};

/// One funnel entry. The funnel always has exactly one entry per mapped
/// stage, ordered by funnel position, never by count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStage {
    pub stage: String,
    pub count: i64,
    pub order: u32,
    /// Percentage of the previous stage's count: 100.0 for the first
    /// stage, 0.0 when the previous stage is empty.
    pub conversion_rate: f64,
}

/// Shape `GROUP BY event_type` count rows into the fixed funnel.
///
/// Stages missing from the result get count 0; event codes outside the
/// stage map are ignored here (the trend view surfaces them instead).
pub(crate) fn shape(rows: &[Row], stages: &StageMap) -> Vec<FunnelStage> {
    let mut funnel: Vec<FunnelStage> = stages
        .iter()
        .map(|(code, stage)| {
            let count = rows
                .iter()
                .find(|row| row.get("event_type").and_then(event_code) == Some(code))
                .and_then(|row| row_i64(row, "cnt"))
                .unwrap_or(0);
            FunnelStage {
                stage: stage.label.clone(),
                count,
                order: stage.order,
                conversion_rate: 0.0,
            }
        })
        .collect();

    funnel.sort_by_key(|s| s.order);

    for i in 0..funnel.len() {
        funnel[i].conversion_rate = if i == 0 {
            100.0
        } else if funnel[i - 1].count > 0 {
            round1(100.0 * funnel[i].count as f64 / funnel[i - 1].count as f64)
        } else {
            0.0
        };
    }

    funnel
}

/// Event-type codes come back as integers from MySQL but as strings from
/// some drivers; accept both.
pub(crate) fn event_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
