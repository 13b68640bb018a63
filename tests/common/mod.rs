#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use funnelboard::{EventStore, Result, Row, SqlValue};
use serde_json::Value;

/// Opt-in test diagnostics: `RUST_LOG=funnelboard=debug cargo test`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Scripted event store: hands back canned responses in order and records
/// every (sql, params) pair it was asked to run, so tests can assert on
/// both the data shaping and the constructed queries.
pub struct StubStore {
    responses: Mutex<VecDeque<Result<Vec<Row>>>>,
    queries: Mutex<Vec<(String, Vec<SqlValue>)>>,
}

impl StubStore {
    pub fn new(responses: Vec<Result<Vec<Row>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Everything queried so far, oldest first.
    pub fn queries(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.queries.lock().unwrap().clone()
    }
}

impl EventStore for StubStore {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        self.queries
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Build a result row from column/value pairs, preserving order.
pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
