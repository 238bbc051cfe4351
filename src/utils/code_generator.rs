//! Short code generation and validation utilities.
//!
//! Generated codes are drawn uniformly from the 62-symbol alphanumeric
//! alphabet. Custom codes supplied by callers are checked against the
//! URL-safe set and the paths reserved by the router.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;

/// Default generated code length. 62^7 ≈ 3.5e12 combinations.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Default number of draws before giving up on a collision streak.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Longest accepted custom code.
pub const MAX_CUSTOM_CODE_LENGTH: usize = 32;

/// Codes that would shadow router paths.
const RESERVED_CODES: &[&str] = &[
    "api", "health", "static", "url", "history", "export", "delete",
];

/// Random short code generator with a bounded retry budget.
///
/// The generator only produces candidates. Uniqueness is decided by the
/// store's atomic insert, and the caller draws again on conflict, at most
/// [`CodeGenerator::max_attempts`] times.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    length: usize,
    max_attempts: usize,
}

impl CodeGenerator {
    pub fn new(length: usize, max_attempts: usize) -> Self {
        Self {
            length: length.max(1),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Draws a fresh random code from `[A-Za-z0-9]`.
    ///
    /// Uses the thread-local CSPRNG.
    pub fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH, DEFAULT_MAX_ATTEMPTS)
    }
}

/// Validates a caller-supplied custom short code.
///
/// # Rules
///
/// - Non-empty, at most [`MAX_CUSTOM_CODE_LENGTH`] characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved router path (case-insensitive)
///
/// Collision with an existing record is not checked here; the store
/// reports it as [`AppError::Conflict`] on insert.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() {
        return Err(AppError::bad_request(
            "Custom code must not be empty",
            json!({}),
        ));
    }

    if code.len() > MAX_CUSTOM_CODE_LENGTH {
        return Err(AppError::bad_request(
            format!("Custom code must be at most {MAX_CUSTOM_CODE_LENGTH} characters"),
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
    {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
