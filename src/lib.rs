//! # Funnelboard
//!
//! A recruitment-funnel analytics engine. Funnelboard turns raw rows of a
//! read-only MySQL event table into funnel metrics, daily trend series,
//! KPI percentages, and a server-side paginated/sortable/searchable
//! table: plain data structures a web layer can render or export.
//!
//! The HTTP surface, charts, and templating are deliberately out of
//! scope: embed the engine in whatever server you run and encode the
//! results however you like.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use funnelboard::{DashboardEngine, DbConfig, EventFilter, MySqlEventStore, PageRequest};
//!
//! #[tokio::main]
//! async fn main() -> funnelboard::Result<()> {
//!     // DB_HOST / DB_USER / DB_PASSWORD / DB_NAME; no baked-in defaults
//!     let config = DbConfig::from_env()?;
//!     let engine = DashboardEngine::new(MySqlEventStore::new(&config));
//!
//!     let filter = EventFilter {
//!         date_start: Some("2025-07-01".into()),
//!         date_end: Some("2025-07-31".into()),
//!         ..Default::default()
//!     };
//!
//!     for stage in engine.funnel(&filter).await? {
//!         println!("{:<18} {:>6} ({:.1}%)", stage.stage, stage.count, stage.conversion_rate);
//!     }
//!
//!     let page = engine.table_page(&filter, &PageRequest::default()).await?;
//!     println!("{} rows over {} pages", page.total_count, page.total_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - Every query is parameter-bound; user input never lands in SQL text.
//! - A read-only guard rejects write/DDL statements before execution.
//! - Database failures degrade to empty, well-formed results (zeroed
//!   funnel, empty page) and are logged with their real cause; only
//!   read-only violations abort.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod filter;
pub mod funnel;
pub mod metrics;
pub mod stage;
pub mod store;
pub mod table;
pub mod trend;
pub mod users;

pub use config::DbConfig;
pub use engine::DashboardEngine;
pub use error::{Error, Result};
pub use filter::{EventFilter, SqlValue, WhereClause, ALL_USERS};
pub use funnel::FunnelStage;
pub use metrics::KeyMetrics;
pub use stage::{Stage, StageMap};
pub use store::{mysql::MySqlEventStore, EventStore, Row};
pub use table::{PageRequest, PageResult, SortDirection, TableRow};
pub use trend::{TrendPoint, TREND_ROW_LIMIT};
pub use users::UserOption;
