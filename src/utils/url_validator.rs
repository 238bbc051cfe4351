//! Target URL validation.
//!
//! The original URL is stored exactly as submitted (after trimming
//! surrounding whitespace), so a redirect always returns what the owner
//! entered. Validation only decides whether the input is acceptable.

use url::Url;

/// Longest accepted target URL, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} bytes")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host")]
    MissingHost,

    #[error("URL must not contain control characters")]
    ControlCharacter,
}

/// Validates a target URL and returns the value to store.
///
/// # Rules
///
/// 1. Surrounding whitespace is trimmed; the result must be non-empty
/// 2. At most [`MAX_URL_LENGTH`] bytes
/// 3. No ASCII control characters (tab, CR, LF ...); the parser would
///    silently drop them but the stored value must be a valid `Location`
/// 4. Must parse as an absolute URL
/// 5. Only `http` and `https` schemes (rejects `javascript:`, `data:`, `file:` ...)
/// 6. Must have a non-empty host
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_url(" https://example.com ").unwrap(), "https://example.com");
/// assert!(validate_url("ftp://example.com").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed.to_string())
}
