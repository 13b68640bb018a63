//! Engine-level funnel and KPI tests over a scripted store.

mod common;

use std::sync::Arc;

use common::{row, StubStore};
use funnelboard::{DashboardEngine, Error, EventFilter, SqlValue};
use serde_json::json;

fn count_rows() -> Vec<funnelboard::Row> {
    vec![
        row(&[("event_type", json!(1)), ("cnt", json!(100))]),
        row(&[("event_type", json!(2)), ("cnt", json!(50))]),
        row(&[("event_type", json!(12)), ("cnt", json!(20))]),
        row(&[("event_type", json!(13)), ("cnt", json!(10))]),
    ]
}

#[tokio::test]
async fn funnel_always_has_four_ordered_stages() {
    let store = Arc::new(StubStore::new(vec![Ok(count_rows())]));
    let engine = DashboardEngine::new(store.clone());

    let funnel = engine.funnel(&EventFilter::default()).await.unwrap();

    assert_eq!(funnel.len(), 4);
    let orders: Vec<_> = funnel.iter().map(|s| s.order).collect();
    assert_eq!(orders, [1, 2, 3, 4]);
    assert_eq!(funnel[0].conversion_rate, 100.0);
    assert_eq!(funnel[2].conversion_rate, 40.0);

    let (sql, params) = &store.queries()[0];
    assert!(sql.contains("GROUP BY event_type"));
    assert!(params.is_empty());
}

#[tokio::test]
async fn filter_values_travel_as_parameters_not_sql_text() {
    let store = Arc::new(StubStore::new(vec![Ok(count_rows())]));
    let engine = DashboardEngine::new(store.clone());

    let filter = EventFilter {
        date_start: Some("2025-07-01".into()),
        date_end: Some("2025-07-31".into()),
        user_id: Some("usr_42".into()),
        ..Default::default()
    };
    engine.funnel(&filter).await.unwrap();

    let (sql, params) = &store.queries()[0];
    assert!(sql.contains("WHERE create_time BETWEEN ? AND ?"));
    assert!(sql.contains("uid = ?"));
    assert!(!sql.contains("2025-07-01"));
    assert!(!sql.contains("usr_42"));
    assert_eq!(
        params.as_slice(),
        &[
            SqlValue::Text("2025-07-01".into()),
            SqlValue::Text("2025-07-31 23:59:59".into()),
            SqlValue::Text("usr_42".into()),
        ]
    );
}

#[tokio::test]
async fn connectivity_failure_degrades_to_zeroed_funnel() {
    common::init_tracing();
    let store = Arc::new(StubStore::new(vec![Err(Error::Connection(
        "connection refused".into(),
    ))]));
    let engine = DashboardEngine::new(store);

    let funnel = engine.funnel(&EventFilter::default()).await.unwrap();
    assert_eq!(funnel.len(), 4);
    assert!(funnel.iter().all(|s| s.count == 0));
}

#[tokio::test]
async fn read_only_violation_aborts_instead_of_degrading() {
    let store = Arc::new(StubStore::new(vec![Err(Error::ReadOnlyViolation(
        "forbidden keyword DELETE in statement".into(),
    ))]));
    let engine = DashboardEngine::new(store);

    let err = engine.funnel(&EventFilter::default()).await.unwrap_err();
    assert!(matches!(err, Error::ReadOnlyViolation(_)));
}

#[tokio::test]
async fn key_metrics_match_the_funnel_scenario() {
    let store = Arc::new(StubStore::new(vec![Ok(count_rows())]));
    let engine = DashboardEngine::new(store);

    let metrics = engine.key_metrics(&EventFilter::default()).await.unwrap();
    assert_eq!(metrics.views, 100);
    assert_eq!(metrics.screened, 50);
    assert_eq!(metrics.chats, 20);
    assert_eq!(metrics.contacts, 10);
    assert_eq!(metrics.contact_rate, 20.0);
    assert_eq!(metrics.chat_rate, 40.0);
}

#[tokio::test]
async fn key_metrics_survive_an_unreachable_database() {
    let store = Arc::new(StubStore::new(vec![Err(Error::Connection(
        "timed out".into(),
    ))]));
    let engine = DashboardEngine::new(store);

    let metrics = engine.key_metrics(&EventFilter::default()).await.unwrap();
    assert_eq!(metrics, funnelboard::KeyMetrics::default());
}
