//! User directory rows for the dashboard's user filter.

use serde::Serialize;

use crate::store::{row_i64, row_str, Row};

/// One selectable user: only users with at least one event appear, ordered
/// by event count. The "all users" sentinel entry is the HTTP layer's
/// concern, not this crate's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserOption {
    pub id: String,
    /// `user.name`, or `user-<first 8 chars of id>` when blank.
    pub display_name: String,
    pub event_count: i64,
}

pub(crate) fn shape(rows: &[Row]) -> Vec<UserOption> {
    rows.iter()
        .filter_map(|row| {
            Some(UserOption {
                id: row_str(row, "id")?.to_string(),
                display_name: row_str(row, "display_name").unwrap_or_default().to_string(),
                event_count: row_i64(row, "event_count").unwrap_or(0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_map_to_user_options() {
        let mut row = Row::new();
        row.insert("id".into(), json!("cku1a2b3c4d5e6f7"));
        row.insert("display_name".into(), json!("user-cku1a2b3"));
        row.insert("event_count".into(), json!(42));

        let users = shape(&[row]);
        assert_eq!(
            users,
            vec![UserOption {
                id: "cku1a2b3c4d5e6f7".into(),
                display_name: "user-cku1a2b3".into(),
                event_count: 42,
            }]
        );
    }

    #[test]
    fn rows_without_id_are_dropped() {
        let mut row = Row::new();
        row.insert("display_name".into(), json!("ghost"));
        assert!(shape(&[row]).is_empty());
    }
}
