//! Daily trend aggregation: tidy (date, event type, count) rows.
//!
//! The chart layer pivots these into one series per type; this module's
//! contract stops at the tidy shape and a stable label set.

use serde::Serialize;

use crate::funnel::event_code;
use crate::stage::StageMap;
use crate::store::{row_i64, row_str, Row};

/// Hard cap on trend rows, applied in SQL (`LIMIT`).
pub const TREND_ROW_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Stage label, or `type-<code>` for unmapped codes.
    pub event_type: String,
    pub count: i64,
}

/// Relabel `GROUP BY day, event_type` rows. Rows without a usable date or
/// code are dropped rather than crashing the view.
pub(crate) fn shape(rows: &[Row], stages: &StageMap) -> Vec<TrendPoint> {
    rows.iter()
        .filter_map(|row| {
            let date = row_str(row, "day")?.to_string();
            let code = row.get("event_type").and_then(event_code)?;
            Some(TrendPoint {
                date,
                event_type: stages.label_for(code),
                count: row_i64(row, "cnt").unwrap_or(0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn trend_row(day: &str, event_type: i64, cnt: i64) -> Row {
        let mut row = Row::new();
        row.insert("day".into(), json!(day));
        row.insert("event_type".into(), json!(event_type));
        row.insert("cnt".into(), json!(cnt));
        row
    }

    #[test]
    fn rows_are_relabeled_via_stage_map() {
        let rows = vec![
            trend_row("2025-07-02", 1, 12),
            trend_row("2025-07-02", 13, 3),
            trend_row("2025-07-01", 2, 5),
        ];
        let points = shape(&rows, &StageMap::standard());
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].event_type, "View");
        assert_eq!(points[1].event_type, "Contact-exchange");
        assert_eq!(points[2], TrendPoint {
            date: "2025-07-01".into(),
            event_type: "Screened".into(),
            count: 5,
        });
    }

    #[test]
    fn unknown_codes_pass_through_without_crashing() {
        let rows = vec![trend_row("2025-07-01", 99, 4)];
        let points = shape(&rows, &StageMap::standard());
        assert_eq!(points[0].event_type, "type-99");
    }

    #[test]
    fn rows_missing_date_or_code_are_dropped() {
        let mut no_date = Row::new();
        no_date.insert("event_type".into(), json!(1));
        no_date.insert("cnt".into(), json!(2));

        let mut no_code = Row::new();
        no_code.insert("day".into(), json!("2025-07-01"));
        no_code.insert("cnt".into(), json!(2));

        assert!(shape(&[no_date, no_code], &StageMap::standard()).is_empty());
    }
}
