//! Sales report endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Local;
use serde::Deserialize;
use tracing::debug;

use vapor_core::period::ReportRange;
use vapor_core::report::SalesReport;

use crate::error::ApiResult;
use crate::state::SharedState;

/// Query string of `GET /reports`.
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub range: Option<String>,
}

/// `GET /reports[?range=daily|weekly|monthly|yearly]`
///
/// Missing or blank `range` means daily. The window is resolved against the
/// server's local clock at request time.
pub async fn get_report(
    State(state): State<SharedState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> ApiResult<Json<SalesReport>> {
    let Query(params) = params?;

    let range = match params.range.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.parse::<ReportRange>()?,
        _ => ReportRange::default(),
    };

    let window = range.window(Local::now());
    debug!(%range, start = %window.start, end = %window.end, "get_report");

    let report = state.db.reports().compute(&window).await?;
    Ok(Json(report))
}
