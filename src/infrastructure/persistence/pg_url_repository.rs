//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

const URL_COLUMNS: &str = "id, code, original_url, owner_id, category, created_at, visit_count";

/// PostgreSQL repository for URL records.
///
/// Atomicity comes from the database: the `urls_code_key` unique constraint
/// arbitrates racing inserts, and visit increments are a single
/// `UPDATE ... SET visit_count = visit_count + 1`.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Distinguishes a missing record from one owned by someone else after
    /// an owner-scoped statement matched no row.
    async fn ownership_error(&self, code: &str) -> AppError {
        let owner: Result<Option<String>, sqlx::Error> =
            sqlx::query_scalar("SELECT owner_id FROM urls WHERE code = $1")
                .bind(code)
                .fetch_optional(self.pool.as_ref())
                .await;

        match owner {
            Ok(Some(_)) => forbidden(code),
            Ok(None) => not_found(code),
            Err(e) => e.into(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    code: String,
    original_url: String,
    owner_id: String,
    category: Option<String>,
    created_at: DateTime<Utc>,
    visit_count: i64,
}

impl From<UrlRow> for UrlRecord {
    fn from(r: UrlRow) -> Self {
        UrlRecord {
            id: r.id,
            code: r.code,
            original_url: r.original_url,
            owner_id: r.owner_id,
            category: r.category,
            created_at: r.created_at,
            visit_count: r.visit_count,
        }
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

fn forbidden(code: &str) -> AppError {
    AppError::forbidden("Short link belongs to another owner", json!({ "code": code }))
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let sql = format!(
            "INSERT INTO urls (code, original_url, owner_id, category) \
             VALUES ($1, $2, $3, $4) RETURNING {URL_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(&new_record.code)
            .bind(&new_record.original_url)
            .bind(&new_record.owner_id)
            .bind(&new_record.category)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict { .. } => AppError::conflict(
                    "Short code already exists",
                    json!({ "code": new_record.code }),
                ),
                other => other,
            })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        let sql = format!("SELECT {URL_COLUMNS} FROM urls WHERE code = $1");

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn increment_visit(&self, code: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE urls SET visit_count = visit_count + 1 WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(code));
        }

        Ok(())
    }

    async fn delete(&self, code: &str, owner_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM urls WHERE code = $1 AND owner_id = $2")
            .bind(code)
            .bind(owner_id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.ownership_error(code).await);
        }

        Ok(())
    }

    async fn list_by_category(
        &self,
        owner_id: &str,
        category: &str,
    ) -> Result<Vec<UrlRecord>, AppError> {
        let sql = format!(
            "SELECT {URL_COLUMNS} FROM urls \
             WHERE owner_id = $1 AND category = $2 ORDER BY id ASC"
        );

        let rows = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(owner_id)
            .bind(category)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_category(
        &self,
        code: &str,
        owner_id: &str,
        category: Option<String>,
    ) -> Result<UrlRecord, AppError> {
        let sql = format!(
            "UPDATE urls SET category = $3 \
             WHERE code = $1 AND owner_id = $2 RETURNING {URL_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(code)
            .bind(owner_id)
            .bind(&category)
            .fetch_optional(self.pool.as_ref())
            .await?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(self.ownership_error(code).await),
        }
    }

    async fn export_all(&self, owner_id: &str) -> Result<Vec<UrlRecord>, AppError> {
        let sql = format!("SELECT {URL_COLUMNS} FROM urls WHERE owner_id = $1 ORDER BY id ASC");

        let rows = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<UrlRecord>, AppError> {
        let sql = format!(
            "SELECT {URL_COLUMNS} FROM urls WHERE owner_id = $1 \
             ORDER BY id DESC LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
