//! Database migration command.
//!
//! Applies the SQL migrations bundled from `crates/server/migrations/`.
//! The server never migrates on startup; this command is the only way
//! schema changes reach a database.

use super::CliError;

/// Run all pending database migrations.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
