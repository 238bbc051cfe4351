//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! - [`cache`] - redirect cache (Redis and no-op)
//! - [`persistence`] - PostgreSQL and in-memory repositories

pub mod cache;
pub mod persistence;
