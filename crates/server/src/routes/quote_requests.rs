//! Quote request route handlers: intake, retrieval, and the admin
//! extensions (status update, delete).

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use welcome_home_core::{NewQuoteRequest, QuoteRequest, QuoteRequestId, QuoteRequestInput, QuoteStatus};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminPassphrase;
use crate::state::AppState;

use super::ApiData;

/// Submit a quote request.
///
/// POST /api/quote-requests
///
/// Validate, persist, respond with the full persisted record, then
/// dispatch the operator notification on a detached task. A
/// notification failure is logged and never reaches the submitter;
/// the record stays valid and pending regardless.
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<QuoteRequestInput>,
) -> Result<Json<ApiData<QuoteRequest>>> {
    let new = NewQuoteRequest::validate(input)?;
    let record = state.storage().create_quote_request(new).await?;

    tracing::info!(
        quote_request_id = %record.id,
        customer = %record.customer_name(),
        services = %record.services.join(", "),
        "Quote request created"
    );

    spawn_notification(&state, record.clone());

    Ok(ApiData::ok(record))
}

/// List all quote requests, newest-first.
///
/// GET /api/quote-requests
///
/// No pagination or filter parameters; the admin client filters and
/// derives its counts locally from the full set.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiData<Vec<QuoteRequest>>>> {
    let records = state.storage().quote_requests().await?;
    Ok(ApiData::ok(records))
}

/// Fetch one quote request.
///
/// GET /api/quote-requests/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiData<QuoteRequest>>> {
    let record = state
        .storage()
        .quote_request(QuoteRequestId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Quote request".to_owned()))?;

    Ok(ApiData::ok(record))
}

/// Status update request body.
#[derive(Debug, serde::Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
}

/// Overwrite a quote request's status.
///
/// PATCH /api/quote-requests/{id}/status (admin-gated)
///
/// The status must be one of the known set; anything else is a 400.
#[instrument(skip(state, body))]
pub async fn update_status(
    _admin: RequireAdminPassphrase,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<ApiData<QuoteRequest>>> {
    let status: QuoteStatus = body
        .status
        .parse()
        .map_err(AppError::BadRequest)?;

    let record = state
        .storage()
        .update_quote_request_status(QuoteRequestId::new(id), status)
        .await?
        .ok_or_else(|| AppError::NotFound("Quote request".to_owned()))?;

    tracing::info!(quote_request_id = %record.id, status = %record.status, "Quote request status updated");

    Ok(ApiData::ok(record))
}

/// Delete a quote request.
///
/// DELETE /api/quote-requests/{id} (admin-gated)
#[instrument(skip(state))]
pub async fn delete(
    _admin: RequireAdminPassphrase,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiData<QuoteRequest>>> {
    let record = state
        .storage()
        .delete_quote_request(QuoteRequestId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Quote request".to_owned()))?;

    tracing::info!(quote_request_id = %record.id, "Quote request deleted");

    Ok(ApiData::ok(record))
}

/// Dispatch the operator notification without blocking the response.
///
/// Completion or failure is observed only through logs; the intake
/// response has already been decided by the time this runs.
fn spawn_notification(state: &AppState, record: QuoteRequest) {
    let Some(service) = state.email() else {
        tracing::debug!(
            quote_request_id = %record.id,
            "Email unconfigured; skipping quote notification"
        );
        return;
    };

    let service = service.clone();
    tokio::spawn(async move {
        if let Err(e) = service.send_quote_notification(&record).await {
            tracing::error!(
                quote_request_id = %record.id,
                error = %e,
                "Quote notification failed"
            );
        }
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::{DateTime, Utc};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::config::{EmailConfig, ServerConfig};
    use crate::middleware::auth::ADMIN_PASSPHRASE_HEADER;
    use crate::services::EmailService;
    use crate::state::AppState;
    use crate::storage::MemoryStorage;

    const TEST_PASSPHRASE: &str = "WelcomeHome2025!";

    fn test_app() -> Router {
        let config = ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            database_url: None,
            admin_passphrase: Some(SecretString::from(TEST_PASSPHRASE)),
            email: None,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config, Arc::new(MemoryStorage::new()), None);
        crate::routes::routes().with_state(state)
    }

    fn valid_payload() -> Value {
        json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "phone": "9725551234",
            "email": "jane@x.com",
            "address": "1 Elm St",
            "city": "Aubrey",
            "state": "TX",
            "services": ["lawn-mowing"]
        })
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn submit(app: &Router, payload: &Value) -> Value {
        let response = app
            .clone()
            .oneshot(post_json("/api/quote-requests", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        read_json(response).await
    }

    #[tokio::test]
    async fn test_intake_returns_persisted_record() {
        let app = test_app();
        let before = Utc::now();

        let body = submit(&app, &valid_payload()).await;

        assert_eq!(body["success"], true);
        let data = &body["data"];
        assert!(data["id"].as_str().unwrap().parse::<uuid::Uuid>().is_ok());
        assert_eq!(data["status"], "pending");
        assert_eq!(data["firstName"], "Jane");
        assert_eq!(data["services"], json!(["lawn-mowing"]));

        let created_at: DateTime<Utc> =
            data["createdAt"].as_str().unwrap().parse().unwrap();
        assert!(created_at >= before);
    }

    #[tokio::test]
    async fn test_intake_rejects_empty_services_and_persists_nothing() {
        let app = test_app();

        let mut payload = valid_payload();
        payload["services"] = json!([]);

        let response = app
            .clone()
            .oneshot(post_json("/api/quote-requests", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid form data");
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"services"));

        // Nothing was persisted
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/quote-requests")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_intake_names_every_missing_field() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json("/api/quote-requests", &json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_json(response).await;
        assert_eq!(body["errors"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_list_round_trip_newest_first() {
        let app = test_app();

        let first = submit(&app, &valid_payload()).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let mut second_payload = valid_payload();
        second_payload["firstName"] = json!("John");
        let second = submit(&app, &second_payload).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/quote-requests")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["id"], second["data"]["id"]);
        assert_eq!(data[1]["id"], first["data"]["id"]);
    }

    #[tokio::test]
    async fn test_show_round_trip_and_not_found() {
        let app = test_app();
        let created = submit(&app, &valid_payload()).await;
        let id = created["data"]["id"].as_str().unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/quote-requests/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["data"], created["data"]);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/quote-requests/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = read_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Quote request not found");
    }

    #[tokio::test]
    async fn test_update_status_requires_passphrase() {
        let app = test_app();
        let created = submit(&app, &valid_payload()).await;
        let id = created["data"]["id"].as_str().unwrap().to_owned();

        // Missing header
        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/api/quote-requests/{id}/status"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"status": "contacted"}).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Valid header
        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/api/quote-requests/{id}/status"))
            .header(header::CONTENT_TYPE, "application/json")
            .header(ADMIN_PASSPHRASE_HEADER, TEST_PASSPHRASE)
            .body(Body::from(json!({"status": "contacted"}).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["data"]["status"], "contacted");
        assert_eq!(body["data"]["createdAt"], created["data"]["createdAt"]);
    }

    #[tokio::test]
    async fn test_update_status_rejects_unknown_status() {
        let app = test_app();
        let created = submit(&app, &valid_payload()).await;
        let id = created["data"]["id"].as_str().unwrap();

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/api/quote-requests/{id}/status"))
            .header(header::CONTENT_TYPE, "application/json")
            .header(ADMIN_PASSPHRASE_HEADER, TEST_PASSPHRASE)
            .body(Body::from(json!({"status": "archived"}).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["message"], "unknown quote status: archived");
    }

    #[tokio::test]
    async fn test_update_status_unknown_id_is_404() {
        let app = test_app();

        let request = Request::builder()
            .method("PATCH")
            .uri(format!(
                "/api/quote-requests/{}/status",
                uuid::Uuid::new_v4()
            ))
            .header(header::CONTENT_TYPE, "application/json")
            .header(ADMIN_PASSPHRASE_HEADER, TEST_PASSPHRASE)
            .body(Body::from(json!({"status": "contacted"}).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_requires_passphrase_and_removes_record() {
        let app = test_app();
        let created = submit(&app, &valid_payload()).await;
        let id = created["data"]["id"].as_str().unwrap().to_owned();

        let unauthorized = Request::builder()
            .method("DELETE")
            .uri(format!("/api/quote-requests/{id}"))
            .header(ADMIN_PASSPHRASE_HEADER, "wrong-passphrase")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(unauthorized).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let authorized = Request::builder()
            .method("DELETE")
            .uri(format!("/api/quote-requests/{id}"))
            .header(ADMIN_PASSPHRASE_HEADER, TEST_PASSPHRASE)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(authorized).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Gone now
        let again = Request::builder()
            .method("DELETE")
            .uri(format!("/api/quote-requests/{id}"))
            .header(ADMIN_PASSPHRASE_HEADER, TEST_PASSPHRASE)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(again).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_gating_without_configured_passphrase_is_503() {
        let config = ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            database_url: None,
            admin_passphrase: None,
            email: None,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config, Arc::new(MemoryStorage::new()), None);
        let app = crate::routes::routes().with_state(state);

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/quote-requests/{}", uuid::Uuid::new_v4()))
            .header(ADMIN_PASSPHRASE_HEADER, TEST_PASSPHRASE)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_intake_succeeds_with_notifications_unconfigured() {
        // No EmailService in state: the spawn path logs and skips,
        // and the submitter still gets a success with the record listed.
        let app = test_app();
        let created = submit(&app, &valid_payload()).await;
        assert_eq!(created["success"], true);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/quote-requests")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_intake_succeeds_when_notification_send_fails() {
        // Transport pointed at an unroutable relay: the spawned send
        // fails, but the submitter still gets a success and the record
        // stays persisted.
        let email_config = EmailConfig {
            smtp_host: "smtp.invalid".to_owned(),
            smtp_port: 587,
            smtp_username: "mailer@example.com".to_owned(),
            smtp_password: SecretString::from("not-a-real-password"),
            from_address: "mailer@example.com".to_owned(),
            notification_email: "ops@example.com".to_owned(),
        };
        let service = EmailService::new(&email_config).unwrap();

        let config = ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            database_url: None,
            admin_passphrase: Some(SecretString::from(TEST_PASSPHRASE)),
            email: Some(email_config),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config, Arc::new(MemoryStorage::new()), Some(service));
        let app = crate::routes::routes().with_state(state);

        let created = submit(&app, &valid_payload()).await;
        assert_eq!(created["success"], true);
        assert_eq!(created["data"]["status"], "pending");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/quote-requests")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["id"], created["data"]["id"]);
    }
}
