//! User management commands.

use welcome_home_core::{User, UserId};

use super::CliError;

/// Create a user with a unique username.
pub async fn create(username: &str, password: &str) -> Result<(), CliError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(CliError::InvalidInput("username must not be empty".into()));
    }
    if password.is_empty() {
        return Err(CliError::InvalidInput("password must not be empty".into()));
    }

    let pool = super::connect().await?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, username, password)
         VALUES ($1, $2, $3)
         RETURNING id, username, password",
    )
    .bind(UserId::generate())
    .bind(username)
    .bind(password)
    .fetch_one(&pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            CliError::InvalidInput(format!("username {username:?} already exists"))
        }
        _ => CliError::Database(e),
    })?;

    tracing::info!(id = %user.id, username = user.username, "User created");
    Ok(())
}
