//! Records Routes
//!
//! Read-only JSON access to the rows of a day, for scripts.
//!
//! - GET /api/v1/records?date=YYYY-MM-DD

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::web::dto::{parse_date, RecordListResponse, RecordsQuery};
use crate::web::error::WebResult;
use crate::web::state::AppState;

/// GET /api/v1/records
///
/// Rows for the requested date, newest first. Backend failures surface as
/// 502 here since there is no page to fall back to.
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecordsQuery>,
) -> WebResult<Json<RecordListResponse>> {
    let date = parse_date(&query.date)?;
    let records = state.backend.fetch_by_date(date).await?;

    tracing::debug!(date = %date, count = records.len(), "Listed records");

    Ok(Json(RecordListResponse {
        date,
        total: records.len(),
        records,
    }))
}
