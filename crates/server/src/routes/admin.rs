//! Admin route handlers.
//!
//! The admin dashboard is an external client; these endpoints are its
//! whole server-side surface beyond the quote request routes. The
//! passphrase check is a plain comparison against a shared secret and
//! is not a security boundary.

use axum::{Json, extract::State};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminPassphrase;
use crate::state::AppState;

use super::ApiData;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct SessionBody {
    pub passphrase: String,
}

/// Login response payload.
#[derive(Debug, Serialize)]
pub struct SessionVerified {
    pub authenticated: bool,
}

/// Verify the shared admin passphrase.
///
/// POST /api/admin/session
///
/// The dashboard records the result in client-local session storage;
/// the server keeps no session state.
#[instrument(skip(state, body))]
pub async fn verify_session(
    State(state): State<AppState>,
    Json(body): Json<SessionBody>,
) -> Result<Json<ApiData<SessionVerified>>> {
    let Some(expected) = state.config().admin_passphrase.as_ref() else {
        return Err(AppError::AdminNotConfigured);
    };

    if body.passphrase != expected.expose_secret() {
        tracing::warn!("Admin login attempt with wrong passphrase");
        return Err(AppError::Unauthorized);
    }

    Ok(ApiData::ok(SessionVerified {
        authenticated: true,
    }))
}

/// Send a fixture quote notification through the live transport.
///
/// POST /api/admin/test-email (admin-gated)
///
/// Lets the operator confirm SMTP credentials before a real customer
/// submits. 503 when email is unconfigured, 502 when the send fails.
#[instrument(skip(state))]
pub async fn send_test_email(
    _admin: RequireAdminPassphrase,
    State(state): State<AppState>,
) -> Result<Json<ApiData<&'static str>>> {
    let service = state.email().ok_or(AppError::EmailNotConfigured)?;
    service.send_test_notification().await?;

    Ok(ApiData::ok("Test email sent successfully"))
}
