//! Per-client rate limiting using the token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Bucket parameters for one limiter.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    /// One token is replenished every `replenish_ms` milliseconds.
    pub replenish_ms: u64,
    pub burst: u32,
}

impl RateLimit {
    /// Sustained rate of `requests_per_second`, with `burst` requests allowed at once.
    pub fn per_second(requests_per_second: u64, burst: u32) -> Self {
        Self {
            replenish_ms: 1000 / requests_per_second.max(1),
            burst,
        }
    }
}

/// Governor layer keyed by `extractor`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Returns
/// `None` when the limits are zero.
fn build<K>(
    extractor: K,
    limit: RateLimit,
) -> Option<GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>>
where
    K: KeyExtractor,
{
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(extractor)
        .per_millisecond(limit.replenish_ms)
        .burst_size(limit.burst)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}

/// Limiter keyed by the socket peer address.
///
/// Requires the service to be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn peer_ip_layer(
    limit: RateLimit,
) -> Option<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    build(PeerIpKeyExtractor, limit)
}

/// Limiter keyed by `X-Forwarded-For` / `X-Real-IP` / `Forwarded`, falling
/// back to the peer address. Use only behind a trusted reverse proxy.
pub fn forwarded_ip_layer(
    limit: RateLimit,
) -> Option<GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    build(SmartIpKeyExtractor, limit)
}
