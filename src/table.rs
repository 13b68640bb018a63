//! Server-side pagination, sorting, and search over aggregated event rows.
//!
//! The table's row granularity is the (day, actor, event-type) group, and
//! every count here is a count of groups (the number of displayed rows),
//! not of raw events.

use serde::{Deserialize, Serialize};

use crate::funnel::event_code;
use crate::stage::StageMap;
use crate::store::{row_i64, row_str, Row};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_SORT_FIELD: &str = "date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Lenient parse for query-string input; anything unrecognized
    /// degrades to the default (descending).
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub sort_field: String,
    pub sort_direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            sort_direction: SortDirection::Desc,
        }
    }
}

/// One aggregated table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Display name (`user-<first 8>` fallback for blank names).
    pub user: String,
    pub user_id: String,
    /// Stage label, or `type-<code>` for unmapped codes.
    pub event_type: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub rows: Vec<TableRow>,
    pub total_count: i64,
    pub total_pages: u32,
    pub page: u32,
    pub page_size: u32,
}

/// Translate a display sort field to the grouped select's alias.
///
/// This allow-list is the ORDER BY injection defense: column expressions
/// cannot be parameter-bound, so anything outside it falls back to the
/// default sort column.
pub(crate) fn sort_expression(field: &str) -> &'static str {
    match field {
        "date" => "day",
        "user" => "uid",
        "event_type" => "event_type",
        "count" => "cnt",
        _ => "day",
    }
}

pub(crate) fn clamp_page(page: u32) -> u32 {
    page.max(1)
}

pub(crate) fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

pub(crate) fn total_pages(total_count: i64, page_size: u32) -> u32 {
    if total_count <= 0 {
        0
    } else {
        ((total_count as u64).div_ceil(page_size as u64)) as u32
    }
}

pub(crate) fn shape_rows(rows: &[Row], stages: &StageMap) -> Vec<TableRow> {
    rows.iter()
        .filter_map(|row| {
            let code = row.get("event_type").and_then(event_code)?;
            Some(TableRow {
                date: row_str(row, "day").unwrap_or_default().to_string(),
                user: row_str(row, "user_name").unwrap_or("unknown").to_string(),
                user_id: row_str(row, "uid").unwrap_or_default().to_string(),
                event_type: stages.label_for(code),
                count: row_i64(row, "cnt").unwrap_or(0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_fields_outside_allow_list_fall_back() {
        assert_eq!(sort_expression("count"), "cnt");
        assert_eq!(sort_expression("user"), "uid");
        assert_eq!(sort_expression("create_time; DROP TABLE user"), "day");
        assert_eq!(sort_expression(""), "day");
    }

    #[test]
    fn page_and_page_size_clamp_instead_of_erroring() {
        assert_eq!(clamp_page(0), 1);
        assert_eq!(clamp_page(3), 3);
        assert_eq!(clamp_page_size(0), 1);
        assert_eq!(clamp_page_size(20), 20);
        assert_eq!(clamp_page_size(10_000), MAX_PAGE_SIZE);
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(total_pages(45, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(0, 20), 0);
    }

    #[test]
    fn sort_direction_parse_degrades_to_desc() {
        assert_eq!(SortDirection::parse("ASC"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Desc);
    }

    #[test]
    fn default_request_matches_documented_defaults() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.sort_field, "date");
        assert_eq!(request.sort_direction, SortDirection::Desc);
    }
}
