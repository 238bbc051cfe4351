//! No-op cache used when Redis is not configured.

use super::service::CacheService;
use async_trait::async_trait;
use tracing::debug;

/// Cache that stores nothing; every lookup is a miss.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Redirect cache disabled");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(&self, _code: &str) -> Option<String> {
        None
    }

    async fn set(&self, _code: &str, _original_url: &str) {}

    async fn invalidate(&self, _code: &str) {}

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}
