//! Visit event model for asynchronous visit counting.

use chrono::{DateTime, Utc};

/// A resolved redirect waiting to be counted.
///
/// Created by the resolver after a successful lookup and sent through a
/// bounded channel so the redirect response never waits on the store.
/// Processed by [`crate::domain::visit_worker::run_visit_worker`].
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub code: String,
    pub visited_at: DateTime<Utc>,
}

impl VisitEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            visited_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_event_creation() {
        let before = Utc::now();
        let event = VisitEvent::new("abc123");

        assert_eq!(event.code, "abc123");
        assert!(event.visited_at >= before);
    }
}
