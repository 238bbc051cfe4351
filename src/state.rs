//! Shared application state injected into handlers.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{AuthService, LinkService, Resolver};
use crate::domain::repositories::{TokenRepository, UrlRepository};
use crate::domain::visit_event::VisitEvent;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::CodeGenerator;

/// Services and handles shared by all requests.
///
/// Repositories are trait objects so the same router serves either storage
/// backend.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn UrlRepository>>,
    pub resolver: Arc<Resolver<dyn UrlRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
    pub repository: Arc<dyn UrlRepository>,
    pub cache: Arc<dyn CacheService>,
}

/// Everything [`AppState::new`] wires together.
pub struct StateParts {
    pub repository: Arc<dyn UrlRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub cache: Arc<dyn CacheService>,
    pub visit_sender: mpsc::Sender<VisitEvent>,
    pub generator: CodeGenerator,
    pub base_url: String,
    pub token_signing_secret: String,
}

impl AppState {
    pub fn new(parts: StateParts) -> Self {
        let StateParts {
            repository,
            tokens,
            cache,
            visit_sender,
            generator,
            base_url,
            token_signing_secret,
        } = parts;

        Self {
            link_service: Arc::new(LinkService::new(
                repository.clone(),
                cache.clone(),
                generator,
                base_url,
            )),
            resolver: Arc::new(Resolver::new(
                repository.clone(),
                cache.clone(),
                visit_sender,
            )),
            auth_service: Arc::new(AuthService::new(tokens, token_signing_secret)),
            repository,
            cache,
        }
    }
}
