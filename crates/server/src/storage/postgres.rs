//! Durable `PostgreSQL` storage backend.
//!
//! Queries are runtime-checked (`sqlx::query_as`) so the crate builds
//! without a live database; the schema lives in
//! `crates/server/migrations/` and is applied via `wh-cli migrate`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use welcome_home_core::{
    NewQuoteRequest, NewUser, QuoteRequest, QuoteRequestId, QuoteStatus, User, UserId,
};

use super::{Storage, StorageError};

/// `PostgreSQL`-backed [`Storage`] implementation.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn create_quote_request(
        &self,
        new: NewQuoteRequest,
    ) -> Result<QuoteRequest, StorageError> {
        // Identifier and timestamp are assigned here, not by column
        // defaults, so both backends behave identically.
        let record = new.into_record(QuoteRequestId::generate(), Utc::now());

        let created = sqlx::query_as::<_, QuoteRequest>(
            r"
            INSERT INTO quote_requests
                (id, first_name, last_name, phone, email, address,
                 city, state, zip, services, description, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, first_name, last_name, phone, email, address,
                      city, state, zip, services, description, status, created_at
            ",
        )
        .bind(record.id)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.phone)
        .bind(&record.email)
        .bind(&record.address)
        .bind(&record.city)
        .bind(&record.state)
        .bind(&record.zip)
        .bind(&record.services)
        .bind(&record.description)
        .bind(record.status)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn quote_requests(&self) -> Result<Vec<QuoteRequest>, StorageError> {
        let records = sqlx::query_as::<_, QuoteRequest>(
            r"
            SELECT id, first_name, last_name, phone, email, address,
                   city, state, zip, services, description, status, created_at
            FROM quote_requests
            ORDER BY created_at DESC, id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn quote_request(
        &self,
        id: QuoteRequestId,
    ) -> Result<Option<QuoteRequest>, StorageError> {
        let record = sqlx::query_as::<_, QuoteRequest>(
            r"
            SELECT id, first_name, last_name, phone, email, address,
                   city, state, zip, services, description, status, created_at
            FROM quote_requests
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update_quote_request_status(
        &self,
        id: QuoteRequestId,
        status: QuoteStatus,
    ) -> Result<Option<QuoteRequest>, StorageError> {
        let record = sqlx::query_as::<_, QuoteRequest>(
            r"
            UPDATE quote_requests
            SET status = $2
            WHERE id = $1
            RETURNING id, first_name, last_name, phone, email, address,
                      city, state, zip, services, description, status, created_at
            ",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_quote_request(
        &self,
        id: QuoteRequestId,
    ) -> Result<Option<QuoteRequest>, StorageError> {
        let record = sqlx::query_as::<_, QuoteRequest>(
            r"
            DELETE FROM quote_requests
            WHERE id = $1
            RETURNING id, first_name, last_name, phone, email, address,
                      city, state, zip, services, description, status, created_at
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StorageError> {
        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (id, username, password)
            VALUES ($1, $2, $3)
            RETURNING id, username, password
            ",
        )
        .bind(UserId::generate())
        .bind(&new.username)
        .bind(&new.password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StorageError::Conflict("username already exists".to_owned());
            }
            StorageError::Database(e)
        })?;

        Ok(user)
    }

    async fn user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, username, password
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, username, password
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
