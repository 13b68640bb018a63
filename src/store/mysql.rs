use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Row as _, TypeInfo};
use tokio::time::timeout;

use crate::config::DbConfig;
use crate::error::{Error, Result};
use crate::filter::SqlValue;
use crate::store::{guard, EventStore, Row};

/// MySQL-backed event store.
///
/// Opens one connection per query and closes it afterwards: the
/// dashboard's resource model is one request, one connection, no pool or
/// cross-request state. Connect and read timeouts apply per attempt.
pub struct MySqlEventStore {
    options: MySqlConnectOptions,
    host: String,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl MySqlEventStore {
    pub fn new(config: &DbConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database)
            .charset(&config.charset);
        Self {
            options,
            host: config.host.clone(),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            read_timeout: Duration::from_secs(config.read_timeout_secs),
        }
    }

    async fn connect(&self) -> Result<MySqlConnection> {
        match timeout(
            self.connect_timeout,
            MySqlConnection::connect_with(&self.options),
        )
        .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(Error::Connection(format!("{}: {e}", self.host))),
            Err(_) => Err(Error::Connection(format!(
                "{}: connect timed out after {:?}",
                self.host, self.connect_timeout
            ))),
        }
    }
}

impl EventStore for MySqlEventStore {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        guard::validate_read_only(sql)?;

        let mut conn = self.connect().await?;

        let mut query = sqlx::query(sql);
        for value in params {
            query = match value {
                SqlValue::Text(text) => query.bind(text),
                SqlValue::Int(int) => query.bind(int),
            };
        }

        tracing::debug!(sql, params = params.len(), "executing read-only query");

        let rows = match timeout(self.read_timeout, query.fetch_all(&mut conn)).await {
            Ok(Ok(rows)) => rows,
            Ok(Err(e)) => return Err(Error::Execution(e.to_string())),
            Err(_) => {
                return Err(Error::Execution(format!(
                    "query timed out after {:?}",
                    self.read_timeout
                )))
            }
        };

        let _ = conn.close().await;

        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &MySqlRow) -> Result<Row> {
    let mut out = Row::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal()).map_err(|e| {
            Error::Decode(format!(
                "column `{}` ({}): {e}",
                column.name(),
                column.type_info().name()
            ))
        })?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

// Counts and ids arrive as integers, DATE()/DATETIME columns as chrono
// values rendered to ISO strings, everything else as text.
fn decode_column(row: &MySqlRow, index: usize) -> std::result::Result<Value, sqlx::Error> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map(Value::from).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(index) {
        return Ok(v.map(Value::from).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v
            .and_then(|f| serde_json::Number::from_f64(f).map(Value::Number))
            .unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<NaiveDateTime>, _>(index) {
        return Ok(v
            .map(|dt| Value::from(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<NaiveDate>, _>(index) {
        return Ok(v
            .map(|d| Value::from(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null));
    }
    let v = row.try_get::<Option<String>, _>(index)?;
    Ok(v.map(Value::from).unwrap_or(Value::Null))
}
