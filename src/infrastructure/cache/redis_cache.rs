//! Redis-backed redirect cache.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "linkvault:url:";

/// Redis cache for redirect lookups.
///
/// Shares one multiplexed `ConnectionManager`, which reconnects on its own.
/// All operations are fail-open.
pub struct RedisCache {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisCache {
    /// Connects to Redis and verifies the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the
    /// connection cannot be established or the PING fails.
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("invalid Redis URL: {e}")))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        let mut ping_conn = conn.clone();
        ping_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::Connection(format!("PING failed: {e}")))?;

        info!(ttl_seconds, "Connected to Redis");

        Ok(Self { conn, ttl_seconds })
    }

    fn key(code: &str) -> String {
        format!("{KEY_PREFIX}{code}")
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, code: &str) -> Option<String> {
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(Self::key(code)).await {
            Ok(hit) => {
                debug!(code, hit = hit.is_some(), "Cache lookup");
                hit
            }
            Err(e) => {
                warn!(code, error = %e, "Redis GET failed");
                None
            }
        }
    }

    async fn set(&self, code: &str, original_url: &str) {
        let mut conn = self.conn.clone();

        if let Err(e) = conn
            .set_ex::<_, _, ()>(Self::key(code), original_url, self.ttl_seconds)
            .await
        {
            warn!(code, error = %e, "Redis SET failed");
        }
    }

    async fn invalidate(&self, code: &str) {
        let mut conn = self.conn.clone();

        match conn.del::<_, i64>(Self::key(code)).await {
            Ok(removed) if removed > 0 => debug!(code, "Cache entry invalidated"),
            Ok(_) => {}
            Err(e) => warn!(code, error = %e, "Redis DEL failed"),
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
