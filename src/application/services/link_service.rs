//! Short link lifecycle: creation, deletion, categorisation and export.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::domain::entities::{NewUrlRecord, UrlRecord, normalize_category};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{CodeGenerator, validate_custom_code};
use crate::utils::url_validator::validate_url;

/// Input for [`LinkService::create`].
#[derive(Debug, Clone)]
pub struct CreateLink {
    pub url: String,
    pub custom_code: Option<String>,
    pub category: Option<String>,
}

/// Owner-facing operations on short links.
///
/// Every operation other than creation is scoped to the calling owner;
/// the repository enforces ownership atomically with the mutation.
pub struct LinkService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    generator: CodeGenerator,
    base_url: String,
}

impl<R: UrlRepository + ?Sized> LinkService<R> {
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        generator: CodeGenerator,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            cache,
            generator,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short link owned by `owner_id`.
    ///
    /// A non-empty `custom_code` is validated and inserted as is; generation
    /// is skipped. Otherwise codes are drawn until the store accepts one, at
    /// most `max_attempts` times.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an invalid URL or custom code
    /// - [`AppError::Conflict`] if the custom code is taken
    /// - [`AppError::GenerationExhausted`] if every generated code collided
    pub async fn create(&self, owner_id: &str, input: CreateLink) -> Result<UrlRecord, AppError> {
        let original_url = validate_url(&input.url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "url": input.url, "reason": e.to_string() }))
        })?;
        let category = normalize_category(input.category);

        let custom_code = input
            .custom_code
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let record = match custom_code {
            Some(code) => {
                validate_custom_code(&code)?;
                self.repository
                    .insert(NewUrlRecord {
                        code,
                        original_url,
                        owner_id: owner_id.to_string(),
                        category,
                    })
                    .await?
            }
            None => {
                self.insert_generated(owner_id, original_url, category)
                    .await?
            }
        };

        metrics::counter!("links_created_total").increment(1);
        info!(code = %record.code, owner = %owner_id, "Short link created");

        Ok(record)
    }

    async fn insert_generated(
        &self,
        owner_id: &str,
        original_url: String,
        category: Option<String>,
    ) -> Result<UrlRecord, AppError> {
        let attempts = self.generator.max_attempts();

        for attempt in 1..=attempts {
            let new_record = NewUrlRecord {
                code: self.generator.generate(),
                original_url: original_url.clone(),
                owner_id: owner_id.to_string(),
                category: category.clone(),
            };

            match self.repository.insert(new_record).await {
                Ok(record) => return Ok(record),
                Err(AppError::Conflict { .. }) => {
                    metrics::counter!("code_collisions_total").increment(1);
                    debug!(attempt, "Generated code collided, drawing again");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::generation_exhausted(
            "Could not allocate a unique short code",
            json!({ "attempts": attempts }),
        ))
    }

    /// Deletes the caller's link and drops its cache entry.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown code, [`AppError::Forbidden`] if
    /// the link belongs to someone else.
    pub async fn delete(&self, owner_id: &str, code: &str) -> Result<(), AppError> {
        self.repository.delete(code, owner_id).await?;
        self.cache.invalidate(code).await;

        info!(code, owner = %owner_id, "Short link deleted");
        Ok(())
    }

    pub async fn list_by_category(
        &self,
        owner_id: &str,
        category: &str,
    ) -> Result<Vec<UrlRecord>, AppError> {
        self.repository
            .list_by_category(owner_id, category.trim())
            .await
    }

    /// Reassigns or clears the category of the caller's link.
    ///
    /// Repeating the same update is a no-op that returns the same record.
    pub async fn update_category(
        &self,
        owner_id: &str,
        code: &str,
        category: Option<String>,
    ) -> Result<UrlRecord, AppError> {
        self.repository
            .update_category(code, owner_id, normalize_category(category))
            .await
    }

    /// All of the caller's links in creation order.
    pub async fn export(&self, owner_id: &str) -> Result<Vec<UrlRecord>, AppError> {
        self.repository.export_all(owner_id).await
    }

    /// One page of the caller's links, newest first, with the total count.
    pub async fn history(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<UrlRecord>, i64), AppError> {
        let items = self.repository.list_by_owner(owner_id, offset, limit).await?;
        let total = self.repository.count_by_owner(owner_id).await?;
        Ok((items, total))
    }

    /// Public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::cache::{MockCacheService, NullCache};
    use chrono::Utc;

    fn record_from(new_record: NewUrlRecord) -> UrlRecord {
        UrlRecord {
            id: 1,
            code: new_record.code,
            original_url: new_record.original_url,
            owner_id: new_record.owner_id,
            category: new_record.category,
            created_at: Utc::now(),
            visit_count: 0,
        }
    }

    fn service(repo: MockUrlRepository) -> LinkService<MockUrlRepository> {
        LinkService::new(
            Arc::new(repo),
            Arc::new(NullCache::new()),
            CodeGenerator::new(7, 3),
            "https://s.test/",
        )
    }

    fn create(url: &str, custom_code: Option<&str>) -> CreateLink {
        CreateLink {
            url: url.to_string(),
            custom_code: custom_code.map(str::to_string),
            category: None,
        }
    }

    fn conflict() -> AppError {
        AppError::conflict("Short code already exists", json!({}))
    }

    #[tokio::test]
    async fn test_create_with_generated_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert()
            .withf(|r| {
                r.code.len() == 7
                    && r.code.chars().all(|c| c.is_ascii_alphanumeric())
                    && r.original_url == "https://example.com"
                    && r.owner_id == "alice"
            })
            .times(1)
            .returning(|r| Ok(record_from(r)));

        let record = service(repo)
            .create("alice", create("https://example.com", None))
            .await
            .unwrap();

        assert_eq!(record.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_create_with_custom_code_skips_generation() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert()
            .withf(|r| r.code == "abc123")
            .times(1)
            .returning(|r| Ok(record_from(r)));

        let record = service(repo)
            .create("alice", create("https://example.com", Some("abc123")))
            .await
            .unwrap();

        assert_eq!(record.code, "abc123");
    }

    #[tokio::test]
    async fn test_custom_code_conflict_is_not_retried() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert().times(1).returning(|_| Err(conflict()));

        let err = service(repo)
            .create("alice", create("https://example.com", Some("abc123")))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_empty_custom_code_falls_back_to_generation() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert()
            .withf(|r| r.code.len() == 7)
            .times(1)
            .returning(|r| Ok(record_from(r)));

        let result = service(repo)
            .create("alice", create("https://example.com", Some("  ")))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_generation_retries_then_succeeds() {
        let mut repo = MockUrlRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_insert()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(conflict()));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|r| Ok(record_from(r)));

        let result = service(repo)
            .create("alice", create("https://example.com", None))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_generation_exhausted_after_max_attempts() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert().times(3).returning(|_| Err(conflict()));

        let err = service(repo)
            .create("alice", create("https://example.com", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::GenerationExhausted { .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_never_reaches_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert().times(0);

        let err = service(repo)
            .create("alice", create("not-a-url", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_reserved_custom_code_rejected() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert().times(0);

        let err = service(repo)
            .create("alice", create("https://example.com", Some("health")))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_category_is_normalized_on_create() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert()
            .withf(|r| r.category.as_deref() == Some("travel"))
            .times(1)
            .returning(|r| Ok(record_from(r)));

        let input = CreateLink {
            category: Some("  travel ".to_string()),
            ..create("https://example.com", None)
        };
        let record = service(repo).create("alice", input).await.unwrap();

        assert_eq!(record.category.as_deref(), Some("travel"));
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete()
            .withf(|code, owner| code == "abc123" && owner == "alice")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| ());

        let service = LinkService::new(
            Arc::new(repo),
            Arc::new(cache),
            CodeGenerator::default(),
            "https://s.test",
        );

        service.delete("alice", "abc123").await.unwrap();
    }

    #[tokio::test]
    async fn test_forbidden_delete_keeps_cache() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete()
            .times(1)
            .returning(|code, _| Err(AppError::forbidden("Forbidden", json!({ "code": code }))));

        let mut cache = MockCacheService::new();
        cache.expect_invalidate().times(0);

        let service = LinkService::new(
            Arc::new(repo),
            Arc::new(cache),
            CodeGenerator::default(),
            "https://s.test",
        );

        let err = service.delete("bob", "abc123").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_update_category_blank_clears() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_category()
            .withf(|code, owner, category| code == "abc" && owner == "alice" && category.is_none())
            .times(1)
            .returning(|code, owner, category| {
                Ok(record_from(NewUrlRecord {
                    code: code.to_string(),
                    original_url: "https://example.com".to_string(),
                    owner_id: owner.to_string(),
                    category,
                }))
            });

        let record = service(repo)
            .update_category("alice", "abc", Some("   ".to_string()))
            .await
            .unwrap();

        assert!(record.category.is_none());
    }

    #[tokio::test]
    async fn test_history_returns_total() {
        let mut repo = MockUrlRepository::new();
        repo.expect_list_by_owner()
            .withf(|owner, offset, limit| owner == "alice" && *offset == 10 && *limit == 10)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));
        repo.expect_count_by_owner().times(1).returning(|_| Ok(12));

        let (items, total) = service(repo).history("alice", 10, 10).await.unwrap();

        assert!(items.is_empty());
        assert_eq!(total, 12);
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = service(MockUrlRepository::new());
        assert_eq!(service.short_url("abc123"), "https://s.test/abc123");
    }
}
