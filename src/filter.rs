//! Turns user-supplied filter input into a parameterized WHERE clause.
//!
//! The output is always a typed pair: a SQL fragment containing only `?`
//! placeholders, and an ordered parameter list. User values never appear
//! in the fragment text. Invalid input (malformed dates, disallowed user
//! ids, search text that sanitizes to nothing) silently degrades to "no
//! condition"; it is never an error.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Sentinel user id meaning "no user restriction".
pub const ALL_USERS: &str = "all";

/// Maximum length of sanitized search text, in characters.
pub const SEARCH_TEXT_MAX: usize = 50;

static USER_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

// HTML-tag-like runs are dropped wholesale before the character filter,
// so "<script>" sanitizes to "" rather than "script".
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// A bound query parameter. LIMIT/OFFSET need integer binds, everything
/// else binds as text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
}

/// Accumulates `AND`-joined conditions and their parameters in order.
#[derive(Debug, Clone, Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    params: Vec<SqlValue>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        condition: impl Into<String>,
        values: impl IntoIterator<Item = SqlValue>,
    ) {
        self.conditions.push(condition.into());
        self.params.extend(values);
    }

    /// `""` when no conditions, else `"WHERE a AND b"`.
    pub fn fragment(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn into_params(self) -> Vec<SqlValue> {
        self.params
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Request-scoped filter input, already parsed out of the HTTP layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub user_id: Option<String>,
    pub search_text: Option<String>,
}

impl EventFilter {
    /// Build the date/user WHERE clause. `prefix` qualifies event-table
    /// columns for joined queries (`""` or `"re."`).
    ///
    /// A date condition is emitted only when both bounds are present,
    /// well-formed `YYYY-MM-DD`, and `start <= end`; the end bound is
    /// extended to end-of-day.
    pub fn to_where(&self, prefix: &str) -> WhereClause {
        let mut clause = WhereClause::new();

        if let (Some(start), Some(end)) = (
            self.date_start.as_deref().and_then(parse_date),
            self.date_end.as_deref().and_then(parse_date),
        ) {
            if start <= end {
                clause.push(
                    format!("{prefix}create_time BETWEEN ? AND ?"),
                    [
                        SqlValue::Text(start.format("%Y-%m-%d").to_string()),
                        SqlValue::Text(format!("{} 23:59:59", end.format("%Y-%m-%d"))),
                    ],
                );
            }
        }

        if let Some(user_id) = self.user_id.as_deref() {
            if user_id != ALL_USERS && USER_ID_RE.is_match(user_id) {
                clause.push(
                    format!("{prefix}uid = ?"),
                    [SqlValue::Text(user_id.to_string())],
                );
            }
        }

        clause
    }

    /// Extend `clause` with the free-text search condition: a substring
    /// match ORed across actor id, event-type code, and date string.
    /// No-op when the sanitized text is empty.
    pub fn append_search(&self, clause: &mut WhereClause, prefix: &str) {
        let text = match self.search_text.as_deref() {
            Some(raw) => sanitize_search_text(raw),
            None => return,
        };
        if text.is_empty() {
            return;
        }

        let pattern = format!("%{text}%");
        clause.push(
            format!(
                "({prefix}uid LIKE ? OR CAST({prefix}event_type AS CHAR) LIKE ? \
                 OR DATE({prefix}create_time) LIKE ?)"
            ),
            [
                SqlValue::Text(pattern.clone()),
                SqlValue::Text(pattern.clone()),
                SqlValue::Text(pattern),
            ],
        );
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Strip tag-like runs, then keep only alphanumerics (Unicode, so CJK
/// survives), underscore, and whitespace; trim and cap the length.
pub fn sanitize_search_text(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, "");
    let kept: String = without_tags
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.trim().chars().take(SEARCH_TEXT_MAX).collect()
}
