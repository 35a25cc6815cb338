//! Application error type and its HTTP representation.
//!
//! Every error leaving a handler is rendered with the same envelope:
//!
//! ```json
//! { "error": true, "message": "...", "details": null }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Message returned whenever a short code is unknown to the durable store.
pub const LINK_NOT_FOUND_MESSAGE: &str =
    "Данная короткая ссылка не существует. Похоже, мы её потеряли =(";

/// Message returned for malformed request input.
pub const VALIDATION_MESSAGE: &str = "Server unable to process user input";

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Uniform error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    MethodNotAllowed { message: String, details: Value },

    /// Unique constraint hit on insert. Retried internally by code allocation.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// The durable store could not be reached or timed out.
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },

    /// Readiness failure (health probes).
    #[error("{message}")]
    ServiceUnavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            details: Value::Null,
        }
    }

    pub fn method_not_allowed() -> Self {
        Self::MethodNotAllowed {
            message: "Method Not Allowed".to_string(),
            details: Value::Null,
        }
    }

    /// The fixed "short link does not exist" error.
    pub fn link_not_found() -> Self {
        Self::not_found(LINK_NOT_FOUND_MESSAGE)
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details: Value::Null,
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            details: Value::Null,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns true for failures worth retrying (store connectivity and timeouts).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::StoreUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the response envelope. Internal details never leave the process.
    pub fn to_body(&self) -> ErrorBody {
        let (message, details) = match self {
            Self::Internal { .. } => (INTERNAL_MESSAGE.to_string(), Value::Null),
            Self::Validation { message, details }
            | Self::NotFound { message, details }
            | Self::MethodNotAllowed { message, details }
            | Self::Conflict { message, details }
            | Self::StoreUnavailable { message, details }
            | Self::ServiceUnavailable { message, details } => (message.clone(), details.clone()),
        };

        ErrorBody {
            error: true,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal { message, details } => {
                tracing::error!(%message, %details, "Internal error");
            }
            Self::StoreUnavailable { message, .. } => {
                tracing::error!(%message, "Durable store unavailable");
            }
            _ => {}
        }

        (self.status_code(), Json(self.to_body())).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }

            // query_canceled: raised when statement_timeout fires
            if db.code().as_deref() == Some("57014") {
                return AppError::store_unavailable("Database statement timed out");
            }
        }

        match e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => AppError::store_unavailable(format!("Database unavailable: {e}")),
            other => AppError::internal("Database error", json!({ "reason": other.to_string() })),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<Value> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let msg = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    json!({
                        "loc": ["body", field.as_ref()],
                        "msg": msg,
                        "type": err.code.as_ref(),
                    })
                })
            })
            .collect();

        AppError::validation(VALIDATION_MESSAGE, Value::Array(details))
    }
}
