//! Redirect resolution on the hot path.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use crate::domain::repositories::UrlRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Resolves short codes to their target URLs and records visits.
///
/// Lookups consult the cache first and fall back to the repository.
/// A cache fill is re-checked against the repository afterwards, so a
/// delete that lands between the read and the fill never leaves a stale
/// entry behind. Visits are handed to the background worker without waiting: a full
/// queue drops the visit rather than delaying the redirect.
pub struct Resolver<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    visits: mpsc::Sender<VisitEvent>,
}

impl<R: UrlRepository + ?Sized> Resolver<R> {
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        visits: mpsc::Sender<VisitEvent>,
    ) -> Self {
        Self {
            repository,
            cache,
            visits,
        }
    }

    /// Returns the original URL for `code` and enqueues one visit.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] if no live record has this code.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let original_url = match self.cache.get(code).await {
            Some(url) => url,
            None => {
                let record = self.repository.find_by_code(code).await?.ok_or_else(|| {
                    AppError::not_found("Short link not found", json!({ "code": code }))
                })?;
                self.cache.set(code, &record.original_url).await;
                self.revalidate_fill(code, record.id).await;
                record.original_url
            }
        };

        self.record_visit(code);
        metrics::counter!("redirects_total").increment(1);

        Ok(original_url)
    }

    /// Drops the entry just written for `code` unless the record with
    /// `filled_id` is still the live one.
    ///
    /// A delete invalidates after removing the record from the store, so
    /// either this read sees the delete or the delete's invalidate runs
    /// after our fill.
    async fn revalidate_fill(&self, code: &str, filled_id: i64) {
        let still_live = match self.repository.find_by_code(code).await {
            Ok(Some(current)) => current.id == filled_id,
            Ok(None) => false,
            Err(e) => {
                debug!(code, error = %e, "Could not re-check cache fill");
                false
            }
        };

        if !still_live {
            debug!(code, "Record changed during cache fill, entry dropped");
            self.cache.invalidate(code).await;
        }
    }

    fn record_visit(&self, code: &str) {
        match self.visits.try_send(VisitEvent::new(code)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("visits_dropped_total").increment(1);
                debug!(code = %event.code, "Visit queue full, visit dropped");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("visits_dropped_total").increment(1);
                debug!(code = %event.code, "Visit queue closed, visit dropped");
            }
        }
    }

    /// Free slots in the visit queue.
    pub fn queue_capacity(&self) -> usize {
        self.visits.capacity()
    }

    pub fn queue_is_closed(&self) -> bool {
        self.visits.is_closed()
    }
}
