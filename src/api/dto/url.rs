//! DTOs for link creation, update and lookup.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::utils::url_validator::validate_target_url;

/// Body of `POST /urls` and `PUT /urls/{code}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UrlRequest {
    /// Absolute http(s) URL to redirect to.
    #[validate(custom(function = "validate_url_field"))]
    pub url: String,
}

/// Full redirect URL for a code.
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlResponse {
    pub url_short: String,
}

fn validate_url_field(url: &str) -> Result<(), ValidationError> {
    validate_target_url(url).map(|_| ()).map_err(|e| {
        let mut err = ValidationError::new(e.code());
        err.message = Some(e.to_string().into());
        err
    })
}
