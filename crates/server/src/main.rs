//! Welcome Home Landscaping site backend.
//!
//! Serves the quote-request intake API for the marketing site and the
//! admin dashboard's retrieval endpoints on a single binary.
//!
//! # Architecture
//!
//! - Axum web framework, JSON API only (the site frontend and admin
//!   dashboard are external consumers)
//! - `PostgreSQL` via sqlx when `DATABASE_URL` is set, otherwise a
//!   volatile in-memory backend for development
//! - Quote notifications over SMTP (lettre) with askama-rendered
//!   bodies, dispatched fire-and-forget after intake
//!
//! # Degradation
//!
//! Missing configuration never prevents startup: no database means
//! memory storage, no SMTP means notifications are skipped, no admin
//! passphrase means gated endpoints answer 503. Each case logs a
//! warning and is visible in `GET /api/health`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

mod config;
mod error;
mod middleware;
mod routes;
mod services;
mod state;
mod storage;

use config::ServerConfig;
use sentry::integrations::tracing as sentry_tracing;
use services::EmailService;
use state::AppState;
use storage::{MemoryStorage, PostgresStorage, Storage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Select the storage backend from configuration.
///
/// Postgres when `DATABASE_URL` is set, otherwise the volatile memory
/// backend with a loud warning.
async fn select_storage(config: &ServerConfig) -> Arc<dyn Storage> {
    match config.database_url.as_ref() {
        Some(url) => {
            let pool = storage::create_pool(url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");
            // Migrations are NOT run automatically on startup.
            // Run them explicitly via: cargo run -p wh-cli -- migrate
            Arc::new(PostgresStorage::new(pool))
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set; using volatile in-memory storage (data is lost on restart)"
            );
            Arc::new(MemoryStorage::new())
        }
    }
}

/// Build the notification service from configuration.
///
/// `None` when SMTP is unconfigured or the transport cannot be built;
/// either way the intake path keeps working without notifications.
async fn build_email_service(config: &ServerConfig) -> Option<EmailService> {
    let email_config = config.email.as_ref()?;

    let service = match EmailService::new(email_config) {
        Ok(service) => service,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build SMTP transport; email notifications disabled");
            return None;
        }
    };

    if service.verify().await {
        tracing::info!(host = email_config.smtp_host, "SMTP connection verified");
    } else {
        tracing::warn!(
            host = email_config.smtp_host,
            "SMTP connection test failed; notification sends may not succeed"
        );
    }

    Some(service)
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "welcome_home_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let storage = select_storage(&config).await;

    let email = build_email_service(&config).await;
    if email.is_none() {
        tracing::warn!("Email notifications disabled; quote requests will not notify the operator");
    }

    if config.admin_passphrase.is_none() {
        tracing::warn!("ADMIN_PASSPHRASE not set; admin endpoints will respond 503");
    }

    let state = AppState::new(config.clone(), storage, email);

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("quote request server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
