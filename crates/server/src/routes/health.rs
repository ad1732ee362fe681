//! Health and diagnostics endpoint.
//!
//! Reports per-subsystem configured state instead of crashing when
//! something is missing: an unconfigured database or mail transport is
//! an explicit `"unconfigured"` in the report, never a hard failure.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

/// Full diagnostic report returned by `GET /api/health`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub database: DatabaseHealth,
    pub email: EmailHealth,
}

/// Storage subsystem state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    /// Whether `DATABASE_URL` was provided (false means memory backend).
    pub configured: bool,
    /// Active backend name (`postgres` or `memory`).
    pub backend: &'static str,
    /// `"success"` or the probe failure message.
    pub connection: String,
}

/// Notification subsystem state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailHealth {
    /// Whether the full SMTP variable set was provided.
    pub configured: bool,
    /// `"***configured***"` or `"missing"`; the address itself is not exposed.
    pub notification_email: &'static str,
}

/// Subsystem diagnostics.
///
/// GET /api/health
///
/// Returns 200 when the active storage backend answers its probe,
/// 500 otherwise (with the failure message in the report).
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let (connection, status_code) = match state.storage().ping().await {
        Ok(()) => ("success".to_owned(), StatusCode::OK),
        Err(e) => (e.to_string(), StatusCode::INTERNAL_SERVER_ERROR),
    };

    let report = HealthReport {
        status: if status_code == StatusCode::OK {
            "ok"
        } else {
            "degraded"
        },
        timestamp: Utc::now(),
        database: DatabaseHealth {
            configured: state.config().database_url.is_some(),
            backend: state.storage().backend_name(),
            connection,
        },
        email: EmailHealth {
            configured: state.email().is_some(),
            notification_email: if state.config().email.is_some() {
                "***configured***"
            } else {
                "missing"
            },
        },
    };

    (status_code, Json(report))
}
