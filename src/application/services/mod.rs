//! Business logic services for the application layer.

pub mod auth_service;
pub mod link_service;
pub mod resolver;

pub use auth_service::{AuthService, Owner, hash_token};
pub use link_service::{CreateLink, LinkService};
pub use resolver::Resolver;
