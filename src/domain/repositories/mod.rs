//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! with `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Short code mappings (insert, lookup, visits, ownership-checked mutation)
//! - [`TokenRepository`] - API token authentication

pub mod token_repository;
pub mod url_repository;

pub use token_repository::{ApiToken, TokenRepository};
pub use url_repository::UrlRepository;

#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use url_repository::MockUrlRepository;
