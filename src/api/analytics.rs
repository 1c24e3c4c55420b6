//! Analytics export endpoints
//!
//! These endpoints respond with a CSV file download instead of JSON.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{error::AppResult, services::reports::CsvExport};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn csv_response(export: CsvExport) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    )
        .into_response()
}

/// Export borrowings within a date range as CSV
#[utoipa::path(
    get,
    path = "/analytics/borrowing-report",
    tag = "analytics",
    params(ReportQuery),
    responses(
        (status = 200, description = "CSV report download", content_type = "text/csv"),
        (status = 400, description = "startDate or endDate missing or malformed"),
        (status = 404, description = "No borrowings in the date range")
    )
)]
pub async fn borrowing_report(
    State(state): State<crate::AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let export = state
        .services
        .reports
        .borrowing_report(query.start_date, query.end_date)
        .await?;

    Ok(csv_response(export))
}

/// Export all borrowings of the previous calendar month as CSV
#[utoipa::path(
    get,
    path = "/analytics/last-month-borrowing",
    tag = "analytics",
    responses(
        (status = 200, description = "CSV report download", content_type = "text/csv"),
        (status = 404, description = "No borrowings last month")
    )
)]
pub async fn borrowings_last_month(State(state): State<crate::AppState>) -> AppResult<Response> {
    let export = state.services.reports.borrowings_last_month().await?;
    Ok(csv_response(export))
}

/// Export overdue borrowings of the previous calendar month as CSV
#[utoipa::path(
    get,
    path = "/analytics/last-month-overdue",
    tag = "analytics",
    responses(
        (status = 200, description = "CSV report download", content_type = "text/csv"),
        (status = 404, description = "No overdue borrowings last month")
    )
)]
pub async fn overdue_last_month(State(state): State<crate::AppState>) -> AppResult<Response> {
    let export = state.services.reports.overdue_last_month().await?;
    Ok(csv_response(export))
}
