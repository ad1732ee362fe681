//! Quote notification emails.
//!
//! Uses SMTP via lettre for delivery with Askama templates for the
//! plain-text and HTML renditions. Dispatch is fire-and-forget from
//! the intake endpoint's perspective: the caller spawns
//! [`EmailService::send_quote_notification`] on a detached task and
//! only ever observes failures in the logs.

use std::time::Duration;

use askama::Template;
use chrono::{DateTime, Utc};
use chrono_tz::America::Chicago;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use welcome_home_core::{NewQuoteRequest, QuoteRequest, QuoteRequestInput};

use crate::config::EmailConfig;

/// Timestamps in notification bodies use the business's local timezone.
const SUBMITTED_FORMAT: &str = "%A, %B %-d, %Y at %-I:%M %p";

/// Connect/send timeout applied to the SMTP transport.
const SMTP_TIMEOUT: Duration = Duration::from_secs(15);

/// HTML template for the quote notification email.
#[derive(Template)]
#[template(path = "email/quote_notification.html")]
struct QuoteNotificationHtml<'a> {
    first_name: &'a str,
    last_name: &'a str,
    phone: &'a str,
    email: &'a str,
    address: &'a str,
    city: &'a str,
    state: &'a str,
    zip: &'a str,
    services: String,
    description: Option<&'a str>,
    id: String,
    status: &'static str,
    submitted: String,
}

/// Plain text template for the quote notification email.
#[derive(Template)]
#[template(path = "email/quote_notification.txt")]
struct QuoteNotificationText<'a> {
    first_name: &'a str,
    last_name: &'a str,
    phone: &'a str,
    email: &'a str,
    address: &'a str,
    city: &'a str,
    state: &'a str,
    zip: &'a str,
    services: String,
    description: Option<&'a str>,
    id: String,
    status: &'static str,
    submitted: String,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service dispatching quote notifications to the operator.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    notification_email: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay parameters are invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            notification_email: config.notification_email.clone(),
        })
    }

    /// Send the new-quote-request notification to the operator.
    ///
    /// # Errors
    ///
    /// Returns error if a template fails to render or the send fails.
    /// Callers on the intake path must log and swallow this - a failed
    /// send never invalidates the persisted record.
    pub async fn send_quote_notification(
        &self,
        quote_request: &QuoteRequest,
    ) -> Result<(), EmailError> {
        let services = quote_request.services.join(", ");
        let subject = format!(
            "New Quote Request - {} ({services})",
            quote_request.customer_name()
        );

        let html = QuoteNotificationHtml {
            first_name: &quote_request.first_name,
            last_name: &quote_request.last_name,
            phone: &quote_request.phone,
            email: quote_request.email.as_str(),
            address: &quote_request.address,
            city: &quote_request.city,
            state: &quote_request.state,
            zip: quote_request.zip.as_deref().unwrap_or("Not provided"),
            services: services.clone(),
            description: quote_request.description.as_deref(),
            id: quote_request.id.to_string(),
            status: quote_request.status.as_str(),
            submitted: format_submitted(quote_request.created_at),
        }
        .render()?;

        let text = QuoteNotificationText {
            first_name: &quote_request.first_name,
            last_name: &quote_request.last_name,
            phone: &quote_request.phone,
            email: quote_request.email.as_str(),
            address: &quote_request.address,
            city: &quote_request.city,
            state: &quote_request.state,
            zip: quote_request.zip.as_deref().unwrap_or("Not provided"),
            services,
            description: quote_request.description.as_deref(),
            id: quote_request.id.to_string(),
            status: quote_request.status.as_str(),
            submitted: format_submitted(quote_request.created_at),
        }
        .render()?;

        self.send_multipart_email(&subject, &text, &html).await
    }

    /// Send a fixture notification through the live transport.
    ///
    /// Backs the admin test-email endpoint and `wh-cli`, so SMTP
    /// problems surface before a real customer submits.
    ///
    /// # Errors
    ///
    /// Returns error if the send fails.
    pub async fn send_test_notification(&self) -> Result<(), EmailError> {
        self.send_quote_notification(&test_quote_request()).await
    }

    /// Verify the SMTP connection without sending anything.
    pub async fn verify(&self) -> bool {
        match self.mailer.test_connection().await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::warn!(error = %e, "SMTP connection test failed");
                false
            }
        }
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                format!("\"Welcome Home Landscaping\" <{}>", self.from_address)
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(self
                .notification_email
                .parse()
                .map_err(|_| EmailError::InvalidAddress(self.notification_email.clone()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %self.notification_email, subject = %subject, "Quote notification sent");
        Ok(())
    }
}

/// Human-readable submission time in the business's timezone.
fn format_submitted(created_at: DateTime<Utc>) -> String {
    created_at
        .with_timezone(&Chicago)
        .format(SUBMITTED_FORMAT)
        .to_string()
}

/// Fixture record for transport tests.
fn test_quote_request() -> QuoteRequest {
    let input = QuoteRequestInput {
        first_name: Some("Test".to_owned()),
        last_name: Some("Customer".to_owned()),
        phone: Some("940-555-0000".to_owned()),
        email: Some("test@example.com".to_owned()),
        address: Some("123 Test Street".to_owned()),
        zip: Some("76227".to_owned()),
        services: vec!["mowing".to_owned(), "pressure-washing".to_owned()],
        description: Some("This is a test email notification".to_owned()),
        ..QuoteRequestInput::default()
    };

    match NewQuoteRequest::validate(input) {
        Ok(new) => new.into_record(welcome_home_core::QuoteRequestId::generate(), Utc::now()),
        // The fixture is statically valid
        Err(e) => unreachable!("test fixture failed validation: {e}"),
    }
}
