//! Redirect cache trait and error types.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache of `code -> original_url` mappings in front of the URL repository.
///
/// Implementations are fail-open: backend errors are logged and reported as
/// misses, so a broken cache degrades to store lookups instead of failing
/// redirects.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL
/// - [`crate::infrastructure::cache::NullCache`] - caching disabled
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached target for `code`, `None` on miss or backend error.
    async fn get(&self, code: &str) -> Option<String>;

    /// Stores the target for `code` with the backend's default TTL.
    async fn set(&self, code: &str, original_url: &str);

    /// Drops the entry for `code`. Called after the record is deleted.
    async fn invalidate(&self, code: &str);

    /// Reports whether the backend answers.
    async fn health_check(&self) -> bool;

    /// Short backend name for health output.
    fn backend(&self) -> &'static str;
}
