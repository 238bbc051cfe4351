//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers a small API
//! that already enforces validation and ownership rules.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, deletion, categories, export
//! - [`services::resolver::Resolver`] - Redirect lookups and visit recording
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
