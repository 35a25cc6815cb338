//! JSON body extractor with validation.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, VALIDATION_MESSAGE};

/// Like [`Json`], but validates the payload and reports every failure,
/// including malformed JSON, as a 422 error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate()?;
        Ok(Self(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    let kind = match &rejection {
        JsonRejection::JsonDataError(_) => "value_error.missing",
        JsonRejection::JsonSyntaxError(_) => "value_error.jsondecode",
        JsonRejection::MissingJsonContentType(_) => "value_error.content_type",
        _ => "value_error",
    };

    AppError::validation(
        VALIDATION_MESSAGE,
        json!([{ "loc": ["body"], "msg": rejection.body_text(), "type": kind }]),
    )
}
