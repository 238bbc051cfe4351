//! Handler for exporting the caller's links.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::api::dto::export::{ExportFormat, ExportParams};
use crate::api::dto::url::UrlResponse;
use crate::application::services::Owner;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::csv_export::{CsvUrlRow, render_csv};

/// Exports all of the caller's links in creation order.
///
/// # Endpoint
///
/// `GET /api/export?format=csv|json`
///
/// CSV (the default) is sent as an attachment named `links.csv`. JSON is
/// a plain array of links.
pub async fn export_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError> {
    let records = state.link_service.export(&owner.id).await?;

    tracing::info!(owner = %owner.id, count = records.len(), format = ?params.format, "Export");

    match params.format {
        ExportFormat::Csv => {
            let rows: Vec<CsvUrlRow> = records
                .iter()
                .map(|r| CsvUrlRow::from_record(r, state.link_service.short_url(&r.code)))
                .collect();
            let body = render_csv(&rows)?;

            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"links.csv\"",
                    ),
                ],
                body,
            )
                .into_response())
        }
        ExportFormat::Json => {
            let items: Vec<UrlResponse> = records
                .into_iter()
                .map(|r| {
                    let short_url = state.link_service.short_url(&r.code);
                    UrlResponse::from_record(r, short_url)
                })
                .collect();

            Ok(Json(items).into_response())
        }
    }
}
