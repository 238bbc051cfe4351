//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`visit_event`] - Visit counting event model
//! - [`visit_worker`] - Asynchronous visit processing worker
//!
//! The domain layer does not depend on infrastructure or presentation code.
//!
//! # Visit Processing Flow
//!
//! 1. The resolver finds the original URL for a short code
//! 2. A [`visit_event::VisitEvent`] is offered to a bounded channel (never blocking)
//! 3. [`visit_worker::run_visit_worker`] applies the increment
//! 4. The count is persisted via [`repositories::UrlRepository::increment_visit`]

pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
