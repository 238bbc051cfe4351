//! In-process token store seeded from configuration.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;

/// Token repository keyed by token hash.
///
/// Used with the in-memory storage backend, where tokens come from the
/// `API_TOKENS` variable instead of the `api_tokens` table.
///
/// Tokens are seeded once at startup and live as long as the process.
/// Nothing at runtime lists, looks up by id or name, or revokes them: the
/// admin CLI that does so works against PostgreSQL only. Those methods are
/// implemented here to complete [`TokenRepository`], so revoking a memory
/// backend token means editing `API_TOKENS` and restarting.
#[derive(Debug, Default)]
pub struct MemoryTokenRepository {
    tokens: DashMap<String, ApiToken>,
    last_id: AtomicI64,
}

impl MemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn find_owner(&self, token_hash: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .tokens
            .get(token_hash)
            .filter(|t| !t.is_revoked())
            .map(|t| t.owner_id.clone()))
    }

    async fn update_last_used(&self, _token_hash: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_token(
        &self,
        name: &str,
        owner_id: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        match self.tokens.entry(token_hash.to_string()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Token already exists",
                json!({ "name": name }),
            )),
            Entry::Vacant(slot) => {
                let token = ApiToken {
                    id: self.last_id.fetch_add(1, Ordering::SeqCst) + 1,
                    name: name.to_string(),
                    owner_id: owner_id.to_string(),
                    token_hash: token_hash.to_string(),
                    created_at: Utc::now(),
                    revoked_at: None,
                };
                slot.insert(token.clone());
                Ok(token)
            }
        }
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let mut tokens: Vec<ApiToken> = self.tokens.iter().map(|t| t.value().clone()).collect();
        tokens.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tokens)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .iter()
            .filter(|t| t.name == name)
            .max_by_key(|t| t.id)
            .map(|t| t.value().clone()))
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let hash = self
            .tokens
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.key().clone())
            .ok_or_else(|| AppError::not_found("Token not found", json!({ "id": id })))?;

        if let Some(mut token) = self.tokens.get_mut(&hash)
            && token.revoked_at.is_none()
        {
            token.revoked_at = Some(Utc::now());
        }

        Ok(())
    }
}
