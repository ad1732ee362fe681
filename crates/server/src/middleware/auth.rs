//! Admin gating for mutating endpoints.
//!
//! The admin dashboard authenticates with a single shared passphrase
//! kept in client-side session storage; requests it makes to gated
//! endpoints carry the passphrase in a header. This is a plain
//! in-process comparison with no lockout - deliberately NOT a security
//! boundary (see DESIGN.md).

use axum::{extract::FromRequestParts, http::request::Parts};
use secrecy::ExposeSecret;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the shared admin passphrase.
pub const ADMIN_PASSPHRASE_HEADER: &str = "x-admin-passphrase";

/// Extractor that requires the admin passphrase header.
///
/// Responds 503 when no passphrase is configured (graceful degradation
/// rather than an open door), 401 when the header is missing or wrong.
///
/// # Example
///
/// ```rust,ignore
/// async fn delete_handler(
///     _admin: RequireAdminPassphrase,
///     State(state): State<AppState>,
/// ) -> impl IntoResponse {
///     // only reached with a valid passphrase
/// }
/// ```
#[derive(Debug)]
pub struct RequireAdminPassphrase;

impl FromRequestParts<AppState> for RequireAdminPassphrase {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config().admin_passphrase.as_ref() else {
            return Err(AppError::AdminNotConfigured);
        };

        let provided = parts
            .headers
            .get(ADMIN_PASSPHRASE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        if provided == expected.expose_secret() {
            Ok(Self)
        } else {
            Err(AppError::Unauthorized)
        }
    }
}
