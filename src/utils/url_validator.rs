//! Target URL validation.
//!
//! Target URLs are stored exactly as submitted; this module only decides
//! whether a string is acceptable.

use serde_json::json;
use url::Url;

use crate::error::{AppError, VALIDATION_MESSAGE};

/// Longest accepted target URL.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL must be at most 2048 characters")]
    TooLong,

    #[error("URL must not contain whitespace or control characters")]
    InvalidCharacters,

    #[error("invalid or missing URL scheme")]
    InvalidFormat(String),

    #[error("URL scheme not permitted")]
    UnsupportedProtocol,

    #[error("URL host required")]
    MissingHost,
}

impl UrlValidationError {
    /// Machine-readable error type, used in validation error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "value_error.any_str.min_length",
            Self::TooLong => "value_error.any_str.max_length",
            Self::InvalidCharacters => "value_error.url",
            Self::InvalidFormat(_) => "value_error.url.scheme",
            Self::UnsupportedProtocol => "value_error.url.scheme",
            Self::MissingHost => "value_error.url.host",
        }
    }
}

impl From<UrlValidationError> for AppError {
    fn from(e: UrlValidationError) -> Self {
        AppError::validation(
            VALIDATION_MESSAGE,
            json!([{ "loc": ["body", "url"], "msg": e.to_string(), "type": e.code() }]),
        )
    }
}

/// Checks that `input` is an absolute `http`/`https` URL with a host.
///
/// The input must already be in its final form: surrounding or embedded
/// whitespace and control characters are rejected rather than stripped, since
/// the string is stored and sent back in `Location` as given.
///
/// # Security
///
/// Rejects `javascript:`, `data:`, `file:` and every other non-HTTP scheme.
///
/// # Errors
///
/// Returns the first rule the input breaks.
pub fn validate_target_url(input: &str) -> Result<Url, UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(UrlValidationError::InvalidCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}
