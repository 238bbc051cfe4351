//! Repository trait for short code mappings (the mapping store).

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Exclusive owner of all [`UrlRecord`]s.
///
/// Every mutation is atomic per code: concurrent inserts of the same code
/// yield one success and one [`AppError::Conflict`], concurrent visit
/// increments never lose updates, and a delete racing an increment leaves
/// the increment either applied before the delete or reporting
/// [`AppError::NotFound`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code already exists.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Looks up a record by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Atomically adds one to the record's visit count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    async fn increment_visit(&self, code: &str) -> Result<(), AppError>;

    /// Deletes a record owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    /// Returns [`AppError::Forbidden`] if the record belongs to someone else.
    async fn delete(&self, code: &str, owner_id: &str) -> Result<(), AppError>;

    /// Lists the owner's records carrying `category`, oldest first.
    async fn list_by_category(
        &self,
        owner_id: &str,
        category: &str,
    ) -> Result<Vec<UrlRecord>, AppError>;

    /// Sets (or clears, with `None`) the category of an owned record.
    ///
    /// Re-setting the current category succeeds and returns the record unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    /// Returns [`AppError::Forbidden`] if the record belongs to someone else.
    async fn update_category(
        &self,
        code: &str,
        owner_id: &str,
        category: Option<String>,
    ) -> Result<UrlRecord, AppError>;

    /// Returns every record of the owner in creation order.
    async fn export_all(&self, owner_id: &str) -> Result<Vec<UrlRecord>, AppError>;

    /// Lists the owner's records newest first.
    async fn list_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<UrlRecord>, AppError>;

    /// Counts the owner's records.
    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError>;

    /// Checks that the backing storage is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
