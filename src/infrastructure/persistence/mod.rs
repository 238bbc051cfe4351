//! Repository implementations.
//!
//! Concrete implementations of the domain repository traits. PostgreSQL
//! repositories use SQLx runtime queries; in-memory repositories keep state
//! in sharded concurrent maps and are selected with `STORAGE_BACKEND=memory`.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - URL records in PostgreSQL
//! - [`PgTokenRepository`] - API token storage and validation
//! - [`MemoryUrlRepository`] - URL records held in process memory
//! - [`MemoryTokenRepository`] - API tokens seeded from configuration

pub mod memory_token_repository;
pub mod memory_url_repository;
pub mod pg_token_repository;
pub mod pg_url_repository;

pub use memory_token_repository::MemoryTokenRepository;
pub use memory_url_repository::MemoryUrlRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_url_repository::PgUrlRepository;
