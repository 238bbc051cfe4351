//! Redirect cache.
//!
//! - [`RedisCache`] - Redis-backed cache, enabled when `REDIS_URL` is set
//! - [`NullCache`] - no-op cache for disabled caching and tests

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
