//! CSV rendering for the export endpoint.

use csv::WriterBuilder;
use serde::Serialize;
use serde_json::json;

use crate::domain::entities::UrlRecord;
use crate::error::AppError;

/// One exported row.
#[derive(Debug, Clone, Serialize)]
pub struct CsvUrlRow {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub category: String,
    pub created_at: String,
    pub visit_count: i64,
}

impl CsvUrlRow {
    pub fn from_record(record: &UrlRecord, short_url: String) -> Self {
        Self {
            code: record.code.clone(),
            short_url,
            original_url: record.original_url.clone(),
            category: record.category.clone().unwrap_or_default(),
            created_at: record.created_at.to_rfc3339(),
            visit_count: record.visit_count,
        }
    }
}

/// Renders rows into a CSV document with a header line.
///
/// An empty slice still produces the header, so downloads always open
/// with column names.
pub fn render_csv(rows: &[CsvUrlRow]) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());

    writer
        .write_record([
            "code",
            "short_url",
            "original_url",
            "category",
            "created_at",
            "visit_count",
        ])
        .map_err(csv_error)?;

    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(|e| {
        AppError::internal("Failed to flush CSV", json!({ "reason": e.to_string() }))
    })?;

    String::from_utf8(bytes)
        .map_err(|e| AppError::internal("CSV is not UTF-8", json!({ "reason": e.to_string() })))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::internal("Failed to write CSV row", json!({ "reason": e.to_string() }))
}
