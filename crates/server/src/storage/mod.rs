//! Storage backends for quote requests and users.
//!
//! A single [`Storage`] capability trait with two implementations,
//! selected once at process start from configuration:
//!
//! - [`PostgresStorage`] - durable, backed by the `quote_requests` and
//!   `users` tables (migrations in `crates/server/migrations/`)
//! - [`MemoryStorage`] - volatile map, development and testing only
//!
//! Callers depend only on the trait (`Arc<dyn Storage>` in app state);
//! nothing mutates records except through it.
//!
//! # Migrations
//!
//! Migrations are NOT run automatically on startup. Run them explicitly:
//! ```bash
//! cargo run -p wh-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use welcome_home_core::{
    NewQuoteRequest, NewUser, QuoteRequest, QuoteRequestId, QuoteStatus, User, UserId,
};

pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;

/// Errors surfaced by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// The storage capability: create/read/update-status/delete for quote
/// requests, plus unique-keyed user records.
///
/// Absent records are signaled with `Ok(None)`, never an error, so
/// callers can map them to not-found envelopes without string matching.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist a validated quote request.
    ///
    /// Assigns a fresh unique identifier, `pending` status, and a
    /// server-side creation timestamp. Never overwrites an existing
    /// record.
    async fn create_quote_request(
        &self,
        new: NewQuoteRequest,
    ) -> Result<QuoteRequest, StorageError>;

    /// All quote requests, newest-first.
    async fn quote_requests(&self) -> Result<Vec<QuoteRequest>, StorageError>;

    /// One quote request by id, or `None`.
    async fn quote_request(
        &self,
        id: QuoteRequestId,
    ) -> Result<Option<QuoteRequest>, StorageError>;

    /// Overwrite the status field only; returns the updated record,
    /// or `None` when the id is unknown.
    async fn update_quote_request_status(
        &self,
        id: QuoteRequestId,
        status: QuoteStatus,
    ) -> Result<Option<QuoteRequest>, StorageError>;

    /// Remove a quote request (admin extension); returns the removed
    /// record, or `None` when the id is unknown.
    async fn delete_quote_request(
        &self,
        id: QuoteRequestId,
    ) -> Result<Option<QuoteRequest>, StorageError>;

    /// Create a user; usernames are unique.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Conflict`] when the username is taken.
    async fn create_user(&self, new: NewUser) -> Result<User, StorageError>;

    /// One user by id, or `None`.
    async fn user(&self, id: UserId) -> Result<Option<User>, StorageError>;

    /// One user by username, or `None`.
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;

    /// Connectivity probe for health diagnostics.
    async fn ping(&self) -> Result<(), StorageError>;

    /// Backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
