//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Identity of an authenticated caller.
///
/// Attached to the request by the auth middleware; every management
/// operation is scoped to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
}

impl Owner {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex MAC. The admin CLI and the
/// in-memory token seeding use the same function, so stored hashes match
/// what [`AuthService::authenticate`] computes.
pub fn hash_token(signing_secret: &str, token: &str) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes()).map_err(|e| {
        AppError::internal("Invalid signing secret", json!({ "reason": e.to_string() }))
    })?;
    mac.update(token.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Authenticates API requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 before lookup. Someone with read
/// access to the token table cannot use the hashes without the secret.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    pub fn hash_token(&self, token: &str) -> Result<String, AppError> {
        hash_token(&self.signing_secret, token)
    }

    /// Resolves a raw token to the owner it is bound to.
    ///
    /// Updates `last_used_at` on success; a failure to do so is ignored.
    ///
    /// # Errors
    ///
    /// [`AppError::Unauthorized`] if the token is unknown or revoked,
    /// [`AppError::Internal`] on storage errors.
    pub async fn authenticate(&self, token: &str) -> Result<Owner, AppError> {
        let token_hash = self.hash_token(token)?;

        let Some(owner_id) = self.repository.find_owner(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Invalid or revoked token" }),
            ));
        };

        let _ = self.repository.update_last_used(&token_hash).await;

        Ok(Owner::new(owner_id))
    }
}
