//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors
//! to Sentry before responding with the JSON envelope the admin client
//! expects: `{"success":false,"message":...,"errors":[...]?}`.
//! Route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use welcome_home_core::ValidationError;

use crate::services::EmailError;
use crate::storage::StorageError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client input failed the validation schema.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage backend unavailable or write failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Mail transport failure (surfaced only by the test-email endpoint;
    /// intake-path notification failures are logged, never propagated).
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Requested identifier is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Admin passphrase missing or wrong.
    #[error("Unauthorized")]
    Unauthorized,

    /// Admin feature used with no passphrase configured.
    #[error("Admin passphrase not configured")]
    AdminNotConfigured,

    /// Email feature used with no SMTP configuration.
    #[error("Email service not configured")]
    EmailNotConfigured,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// The uniform failure envelope.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<welcome_home_core::FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Storage(_) | Self::Email(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Email(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AdminNotConfigured | Self::EmailNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        };

        // Don't expose internal error details to clients
        let (message, errors) = match self {
            Self::Validation(err) => ("Invalid form data".to_owned(), Some(err.errors)),
            Self::Storage(_) => ("Internal server error".to_owned(), None),
            Self::Email(_) => ("Email service error".to_owned(), None),
            Self::NotFound(what) => (format!("{what} not found"), None),
            Self::Unauthorized => ("Unauthorized".to_owned(), None),
            Self::AdminNotConfigured => ("Admin passphrase not configured".to_owned(), None),
            Self::EmailNotConfigured => ("Email service not configured".to_owned(), None),
            Self::BadRequest(msg) => (msg, None),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
                errors,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
