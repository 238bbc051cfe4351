#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use dashmap::DashMap;
use linkvault::config::StaticToken;
use linkvault::domain::entities::NewUrlRecord;
use linkvault::domain::repositories::UrlRepository;
use linkvault::domain::visit_event::VisitEvent;
use linkvault::infrastructure::cache::{CacheService, NullCache};
use linkvault::infrastructure::persistence::{MemoryTokenRepository, MemoryUrlRepository};
use linkvault::routes::{RouterOptions, build_router};
use linkvault::server::seed_tokens;
use linkvault::state::{AppState, StateParts};
use linkvault::utils::code_generator::CodeGenerator;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://sho.rt";
pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";

/// In-memory application with two owners, `alice` and `bob`.
pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<MemoryUrlRepository>,
    pub visits: mpsc::Receiver<VisitEvent>,
}

/// In-process stand-in for the Redis cache: stores every entry, no TTL.
#[derive(Default)]
pub struct MapCache {
    entries: DashMap<String, String>,
}

impl MapCache {
    pub fn cached(&self, code: &str) -> Option<String> {
        self.entries.get(code).map(|url| url.value().clone())
    }
}

#[async_trait]
impl CacheService for MapCache {
    async fn get(&self, code: &str) -> Option<String> {
        self.cached(code)
    }

    async fn set(&self, code: &str, original_url: &str) {
        self.entries
            .insert(code.to_string(), original_url.to_string());
    }

    async fn invalidate(&self, code: &str) {
        self.entries.remove(code);
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

pub async fn create_test_state(
    queue_capacity: usize,
    cache: Arc<dyn CacheService>,
) -> (AppState, Arc<MemoryUrlRepository>, mpsc::Receiver<VisitEvent>) {
    let repository = Arc::new(MemoryUrlRepository::new());
    let tokens = Arc::new(MemoryTokenRepository::new());
    seed_tokens(
        tokens.as_ref(),
        &[
            StaticToken {
                owner_id: "alice".to_string(),
                token: ALICE_TOKEN.to_string(),
            },
            StaticToken {
                owner_id: "bob".to_string(),
                token: BOB_TOKEN.to_string(),
            },
        ],
        SIGNING_SECRET,
    )
    .await
    .unwrap();

    let (tx, rx) = mpsc::channel(queue_capacity);

    let state = AppState::new(StateParts {
        repository: repository.clone(),
        tokens,
        cache,
        visit_sender: tx,
        generator: CodeGenerator::new(7, 5),
        base_url: BASE_URL.to_string(),
        token_signing_secret: SIGNING_SECRET.to_string(),
    });

    (state, repository, rx)
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_queue(100).await
}

pub async fn spawn_app_with_queue(queue_capacity: usize) -> TestApp {
    build_app(queue_capacity, Arc::new(NullCache::new()), RouterOptions::default()).await
}

/// App wired to a [`MapCache`], returned alongside so tests can inspect it.
pub async fn spawn_cached_app() -> (TestApp, Arc<MapCache>) {
    let cache = Arc::new(MapCache::default());
    let app = build_app(100, cache.clone(), RouterOptions::default()).await;
    (app, cache)
}

pub async fn spawn_app_with_options(options: RouterOptions) -> TestApp {
    build_app(100, Arc::new(NullCache::new()), options).await
}

async fn build_app(
    queue_capacity: usize,
    cache: Arc<dyn CacheService>,
    options: RouterOptions,
) -> TestApp {
    let (state, repository, visits) = create_test_state(queue_capacity, cache).await;
    let server = TestServer::new(build_router(state, options)).unwrap();

    TestApp {
        server,
        repository,
        visits,
    }
}

pub async fn create_test_url(
    repository: &MemoryUrlRepository,
    code: &str,
    url: &str,
    owner: &str,
    category: Option<&str>,
) {
    repository
        .insert(NewUrlRecord {
            code: code.to_string(),
            original_url: url.to_string(),
            owner_id: owner.to_string(),
            category: category.map(str::to_string),
        })
        .await
        .unwrap();
}
