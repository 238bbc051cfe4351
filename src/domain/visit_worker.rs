//! Background worker applying visit increments.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::domain::repositories::UrlRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;

/// Drains the visit queue and increments visit counts.
///
/// At most `concurrency` increments are in flight at once. Each event is
/// applied exactly once with no retry: a record deleted after its redirect
/// yields [`AppError::NotFound`], which is ignored. Other failures are
/// logged and the visit is lost.
///
/// Returns when every sender is dropped and all in-flight increments have
/// completed.
pub async fn run_visit_worker<R>(
    mut rx: mpsc::Receiver<VisitEvent>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: UrlRepository + ?Sized + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tokio::spawn(async move {
            apply_visit(repository.as_ref(), &event).await;
            drop(permit);
        });
    }

    // Wait for the tail of in-flight increments.
    let _ = permits.acquire_many(concurrency.max(1) as u32).await;
    info!("Visit worker stopped");
}

async fn apply_visit<R>(repository: &R, event: &VisitEvent)
where
    R: UrlRepository + ?Sized,
{
    match repository.increment_visit(&event.code).await {
        Ok(()) => {
            metrics::counter!("visits_recorded_total").increment(1);
        }
        Err(AppError::NotFound { .. }) => {
            debug!(code = %event.code, "Visit for deleted link ignored");
        }
        Err(e) => {
            metrics::counter!("visits_failed_total").increment(1);
            warn!(code = %event.code, error = %e, "Failed to record visit");
        }
    }
}
