//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional (server)
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//!
//! ## Optional (storage)
//! - `DATABASE_URL` - `PostgreSQL` connection string. When absent the
//!   server falls back to the volatile in-memory backend (development
//!   and testing only) and logs a warning.
//!
//! ## Optional (admin)
//! - `ADMIN_PASSPHRASE` - Shared passphrase gating admin endpoints.
//!   When absent, admin endpoints respond 503.
//!
//! ## Optional (email - all of these required to enable notifications)
//! - `SMTP_HOST` - SMTP server hostname
//! - `SMTP_USERNAME` - SMTP authentication username
//! - `SMTP_PASSWORD` - SMTP authentication password
//! - `SMTP_FROM` - Email sender address (defaults to `SMTP_USERNAME`)
//! - `NOTIFICATION_EMAIL` - Operator address receiving quote notifications
//! - `SMTP_PORT` - SMTP port (default: 587)
//!
//! ## Optional (observability)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
///
/// Every subsystem degrades gracefully when unconfigured: missing
/// database falls back to memory storage, missing SMTP disables
/// notifications, missing passphrase disables admin endpoints. The
/// health endpoint reports each subsystem's configured state.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Shared admin passphrase (not a security boundary, see DESIGN.md)
    pub admin_passphrase: Option<SecretString>,
    /// SMTP configuration; `None` disables quote notifications
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

/// SMTP configuration for outbound quote notifications.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
    /// Fixed operator recipient for quote notifications
    pub notification_email: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("notification_email", &self.notification_email)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a present variable fails to parse
    /// (bind address, port numbers).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SITE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SITE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_PORT".to_string(), e.to_string()))?;

        let database_url = get_optional_env("DATABASE_URL").map(SecretString::from);
        let admin_passphrase = get_optional_env("ADMIN_PASSPHRASE").map(SecretString::from);
        let email = EmailConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            database_url,
            admin_passphrase,
            email,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EmailConfig {
    /// Assemble the email configuration, or `None` when disabled.
    ///
    /// Notifications need `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD`,
    /// and `NOTIFICATION_EMAIL`. A partial set is treated as disabled,
    /// with a warning naming the missing variables so a typo does not
    /// silently drop notifications.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let vars = [
            "SMTP_HOST",
            "SMTP_USERNAME",
            "SMTP_PASSWORD",
            "NOTIFICATION_EMAIL",
        ];
        let missing: Vec<&str> = vars
            .iter()
            .copied()
            .filter(|v| get_optional_env(v).is_none())
            .collect();

        if missing.len() == vars.len() {
            return Ok(None);
        }
        if !missing.is_empty() {
            tracing::warn!(
                missing = missing.join(", "),
                "Partial SMTP configuration; email notifications disabled"
            );
            return Ok(None);
        }

        let smtp_host = get_required_env("SMTP_HOST")?;
        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;
        let smtp_username = get_required_env("SMTP_USERNAME")?;
        let smtp_password = SecretString::from(get_required_env("SMTP_PASSWORD")?);
        let from_address =
            get_optional_env("SMTP_FROM").unwrap_or_else(|| smtp_username.clone());
        let notification_email = get_required_env("NOTIFICATION_EMAIL")?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_address,
            notification_email,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
