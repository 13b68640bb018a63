//! The dashboard engine: fixed-shape queries plus row shaping.
//!
//! One method per dashboard view. Each builds its SQL next to the code
//! that shapes the result, runs it through the degrade-on-failure helper,
//! and returns plain data for the HTTP layer to encode.

use crate::error::Result;
use crate::export;
use crate::filter::{EventFilter, SqlValue};
use crate::funnel::{self, FunnelStage};
use crate::metrics::KeyMetrics;
use crate::stage::StageMap;
use crate::store::{row_i64, EventStore, Row};
use crate::table::{self, PageRequest, PageResult, SortDirection, TableRow};
use crate::trend::{self, TrendPoint, TREND_ROW_LIMIT};
use crate::users::{self, UserOption};

// Display-name fallback used by the table and user-directory queries.
const USER_DISPLAY: &str = "CASE WHEN u.name IS NOT NULL AND u.name != '' THEN u.name \
     WHEN re.uid IS NOT NULL THEN CONCAT('user-', LEFT(re.uid, 8)) \
     ELSE 'unknown' END";

/// Read-side analytics over the recruitment event store.
///
/// Holds the store and the shared stage lookup injected into every
/// aggregation; everything else is request-scoped.
pub struct DashboardEngine<S> {
    store: S,
    stages: StageMap,
}

impl<S: EventStore> DashboardEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_stages(store, StageMap::standard())
    }

    pub fn with_stages(store: S, stages: StageMap) -> Self {
        Self { store, stages }
    }

    pub fn stages(&self) -> &StageMap {
        &self.stages
    }

    /// Run a query, degrading connectivity/execution failures to an empty
    /// row set. The failure kind is logged so operators can tell "no
    /// data" from "database unreachable"; read-only violations are logic
    /// bugs and propagate.
    async fn run(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        match self.store.query(sql, params).await {
            Ok(rows) => Ok(rows),
            Err(e) if e.is_degradable() => {
                tracing::error!(error = %e, "event store query failed; serving empty result");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Per-stage event counts with step-over-step conversion rates.
    /// Always exactly one entry per mapped stage, in funnel order.
    pub async fn funnel(&self, filter: &EventFilter) -> Result<Vec<FunnelStage>> {
        let clause = filter.to_where("");
        let sql = format!(
            "SELECT event_type, COUNT(*) AS cnt FROM recruit_event {} \
             GROUP BY event_type ORDER BY cnt DESC",
            clause.fragment()
        );
        let rows = self.run(&sql, clause.params()).await?;
        Ok(funnel::shape(&rows, &self.stages))
    }

    /// Daily per-type counts, newest day first, capped at
    /// [`TREND_ROW_LIMIT`] rows.
    pub async fn trend(&self, filter: &EventFilter) -> Result<Vec<TrendPoint>> {
        let clause = filter.to_where("");
        let sql = format!(
            "SELECT DATE(create_time) AS day, event_type, COUNT(*) AS cnt \
             FROM recruit_event {} \
             GROUP BY day, event_type ORDER BY day DESC LIMIT {TREND_ROW_LIMIT}",
            clause.fragment()
        );
        let rows = self.run(&sql, clause.params()).await?;
        Ok(trend::shape(&rows, &self.stages))
    }

    /// KPI percentages derived from the funnel under the same filter.
    pub async fn key_metrics(&self, filter: &EventFilter) -> Result<KeyMetrics> {
        let funnel = self.funnel(filter).await?;
        Ok(KeyMetrics::from_funnel(&funnel))
    }

    /// One page of the (day, actor, event-type) aggregated table.
    ///
    /// `total_count` counts aggregated groups across all pages, not raw
    /// events. Sorting always tie-breaks on the full grouping key, so
    /// repeated calls are deterministic and flipping the direction
    /// reverses the order exactly.
    pub async fn table_page(
        &self,
        filter: &EventFilter,
        request: &PageRequest,
    ) -> Result<PageResult> {
        let page = table::clamp_page(request.page);
        let page_size = table::clamp_page_size(request.page_size);

        let mut clause = filter.to_where("re.");
        filter.append_search(&mut clause, "re.");
        let grouped = grouped_select(&clause.fragment());

        let count_sql = format!("SELECT COUNT(*) AS total FROM ({grouped}) AS grouped");
        let count_rows = self.run(&count_sql, clause.params()).await?;
        let total_count = count_rows
            .first()
            .and_then(|row| row_i64(row, "total"))
            .unwrap_or(0);

        let data_sql = format!(
            "{grouped} {} LIMIT ? OFFSET ?",
            order_by(&request.sort_field, request.sort_direction)
        );
        let mut params = clause.params().to_vec();
        params.push(SqlValue::Int(page_size as i64));
        params.push(SqlValue::Int((page as i64 - 1) * page_size as i64));
        let rows = self.run(&data_sql, &params).await?;

        Ok(PageResult {
            rows: table::shape_rows(&rows, &self.stages),
            total_count,
            total_pages: table::total_pages(total_count, page_size),
            page,
            page_size,
        })
    }

    /// The table's unpaginated row form, for CSV export.
    pub async fn export_rows(
        &self,
        filter: &EventFilter,
        sort_field: &str,
        sort_direction: SortDirection,
    ) -> Result<Vec<TableRow>> {
        let mut clause = filter.to_where("re.");
        filter.append_search(&mut clause, "re.");
        let sql = format!(
            "{} {}",
            grouped_select(&clause.fragment()),
            order_by(sort_field, sort_direction)
        );
        let rows = self.run(&sql, clause.params()).await?;
        Ok(table::shape_rows(&rows, &self.stages))
    }

    /// The unpaginated rows serialized as CSV.
    pub async fn export_csv(
        &self,
        filter: &EventFilter,
        sort_field: &str,
        sort_direction: SortDirection,
    ) -> Result<String> {
        let rows = self.export_rows(filter, sort_field, sort_direction).await?;
        Ok(export::to_csv(&rows))
    }

    /// Users with at least one event, busiest first.
    pub async fn user_list(&self) -> Result<Vec<UserOption>> {
        let sql = "SELECT u.id AS id, \
             CASE WHEN u.name IS NOT NULL AND u.name != '' THEN u.name \
             ELSE CONCAT('user-', LEFT(u.id, 8)) END AS display_name, \
             COUNT(re.id) AS event_count \
             FROM user u LEFT JOIN recruit_event re ON u.id = re.uid \
             GROUP BY u.id, u.name \
             HAVING event_count > 0 \
             ORDER BY event_count DESC";
        let rows = self.run(sql, &[]).await?;
        Ok(users::shape(&rows))
    }
}

/// The aggregated table shape shared by the count, page, and export
/// queries. No ORDER BY here: the count query wraps it as a subselect.
fn grouped_select(where_fragment: &str) -> String {
    format!(
        "SELECT DATE(re.create_time) AS day, re.uid AS uid, \
         re.event_type AS event_type, {USER_DISPLAY} AS user_name, \
         COUNT(*) AS cnt \
         FROM recruit_event re LEFT JOIN user u ON re.uid = u.id {where_fragment} \
         GROUP BY day, re.uid, re.event_type, u.name"
    )
}

fn order_by(sort_field: &str, direction: SortDirection) -> String {
    format!(
        "ORDER BY {} {}, day DESC, uid ASC, event_type ASC",
        table::sort_expression(sort_field),
        direction.as_sql()
    )
}
