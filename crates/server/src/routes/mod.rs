//! HTTP route handlers for the site API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Bare liveness check
//! GET  /api/health                          - Subsystem diagnostics
//!
//! # Quote requests
//! POST   /api/quote-requests                - Submit a quote request (intake)
//! GET    /api/quote-requests                - List all (admin consumer, newest-first)
//! GET    /api/quote-requests/{id}           - Fetch one
//! PATCH  /api/quote-requests/{id}/status    - Update status (admin-gated)
//! DELETE /api/quote-requests/{id}           - Delete (admin-gated)
//!
//! # Admin
//! POST /api/admin/session                   - Verify the shared passphrase
//! POST /api/admin/test-email                - Send a fixture notification (admin-gated)
//! ```
//!
//! Successful responses are wrapped in `{"success":true,"data":...}`;
//! failures in `{"success":false,"message":...,"errors":[...]?}` (see
//! [`crate::error::AppError`]).

pub mod admin;
pub mod health;
pub mod quote_requests;

use axum::{
    Json, Router,
    routing::{get, patch, post},
};
use serde::Serialize;

use crate::state::AppState;

/// The uniform success envelope.
#[derive(Debug, Serialize)]
pub struct ApiData<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiData<T> {
    /// Wrap a payload in the success envelope.
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Create the quote request routes router.
pub fn quote_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(quote_requests::create).get(quote_requests::list),
        )
        .route(
            "/{id}",
            get(quote_requests::show).delete(quote_requests::delete),
        )
        .route("/{id}/status", patch(quote_requests::update_status))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/session", post(admin::verify_session))
        .route("/test-email", post(admin::send_test_email))
}

/// Create all routes for the site API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/quote-requests", quote_request_routes())
        .nest("/api/admin", admin_routes())
        .route("/api/health", get(health::health))
}
