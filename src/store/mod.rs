//! Read-only access to the event database.
//!
//! A store executes parameterized SQL and hands back rows as ordered
//! column → value maps (`serde_json` with `preserve_order`), so nothing
//! database-specific leaks past this boundary. Failures come back as
//! typed error kinds; the engine decides which of them degrade to empty
//! results.

pub mod guard;
pub mod mysql;

use std::future::Future;

use serde_json::Value;

use crate::error::Result;
use crate::filter::SqlValue;

/// One result row: column name → value, in select-list order.
pub type Row = serde_json::Map<String, Value>;

pub trait EventStore: Send + Sync {
    /// Execute a read-only statement with bound parameters.
    ///
    /// Implementations must reject write/DDL statements (see [`guard`])
    /// before touching the database.
    fn query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<Vec<Row>>> + Send;
}

impl<S: EventStore> EventStore for std::sync::Arc<S> {
    fn query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<Vec<Row>>> + Send {
        (**self).query(sql, params)
    }
}

/// Integer column access tolerant of drivers that return numerics as
/// strings.
pub(crate) fn row_i64(row: &Row, column: &str) -> Option<i64> {
    match row.get(column)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn row_str<'a>(row: &'a Row, column: &str) -> Option<&'a str> {
    row.get(column)?.as_str()
}
