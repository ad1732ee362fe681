//! Quote request data model and validation schema.
//!
//! A [`QuoteRequestInput`] is whatever the client sent. Running it
//! through [`NewQuoteRequest::validate`] either yields a normalized
//! creation payload or a [`ValidationError`] carrying one message per
//! invalid field - all-or-nothing, never a partial accept. Storage
//! backends turn the payload into a persisted [`QuoteRequest`] by
//! assigning the identifier, status, and creation timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, QuoteRequestId, QuoteStatus, UserId};

/// City applied when a submission leaves it blank.
pub const DEFAULT_CITY: &str = "Aubrey";

/// Two-letter state code applied when a submission leaves it blank.
pub const DEFAULT_STATE: &str = "TX";

/// Minimum number of characters for a phone number.
pub const MIN_PHONE_LENGTH: usize = 10;

/// A persisted customer inquiry for landscaping / power-washing work.
///
/// Created once via the intake endpoint; after that only `status` ever
/// changes (and deletion via the admin extension). `created_at` is set
/// server-side at creation and is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub id: QuoteRequestId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
    /// Requested service identifiers, insertion order preserved. Never empty.
    pub services: Vec<String>,
    pub description: Option<String>,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
}

impl QuoteRequest {
    /// Customer's full name, for email subjects and log lines.
    #[must_use]
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Raw quote request submission, exactly as deserialized from the client.
///
/// Every field is optional at this layer so that a missing field shows
/// up as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestInput {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A validated, normalized quote request ready to be persisted.
///
/// Construct via [`NewQuoteRequest::validate`]; the non-empty services
/// invariant holds for every value of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuoteRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
    pub services: Vec<String>,
    pub description: Option<String>,
}

impl NewQuoteRequest {
    /// Validate a raw submission into a creation payload.
    ///
    /// Enforces the full constraint set: required non-empty name,
    /// phone, and address fields; minimum phone length; syntactic
    /// email check; at least one service. Injects the city/state
    /// defaults and trims every string. Whitespace-only input counts
    /// as missing.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming every invalid field when
    /// any constraint is violated. Nothing is partially accepted.
    pub fn validate(input: QuoteRequestInput) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        let first_name = required_field(input.first_name, "firstName", "First name is required", &mut errors);
        let last_name = required_field(input.last_name, "lastName", "Last name is required", &mut errors);
        let address = required_field(input.address, "address", "Address is required", &mut errors);

        let phone = input.phone.map(|p| p.trim().to_owned()).unwrap_or_default();
        if phone.len() < MIN_PHONE_LENGTH {
            errors.push(FieldError::new("phone", "Valid phone number is required"));
        }

        let email = match Email::parse(input.email.as_deref().unwrap_or_default()) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push(FieldError::new("email", "Valid email is required"));
                None
            }
        };

        let services: Vec<String> = input
            .services
            .into_iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
        if services.is_empty() {
            errors.push(FieldError::new(
                "services",
                "At least one service must be selected",
            ));
        }

        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        let city = non_blank(input.city).unwrap_or_else(|| DEFAULT_CITY.to_owned());
        let state = non_blank(input.state).unwrap_or_else(|| DEFAULT_STATE.to_owned());

        // The error check above guarantees these are present
        let (Some(first_name), Some(last_name), Some(address), Some(email)) =
            (first_name, last_name, address, email)
        else {
            unreachable!("required fields verified above");
        };

        Ok(Self {
            first_name,
            last_name,
            phone,
            email,
            address,
            city,
            state,
            zip: non_blank(input.zip),
            services,
            description: non_blank(input.description),
        })
    }

    /// Assemble the persisted record from this payload.
    ///
    /// Storage backends call this with a freshly generated identifier;
    /// status starts as [`QuoteStatus::Pending`].
    #[must_use]
    pub fn into_record(self, id: QuoteRequestId, created_at: DateTime<Utc>) -> QuoteRequest {
        QuoteRequest {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            city: self.city,
            state: self.state,
            zip: self.zip,
            services: self.services,
            description: self.description,
            status: QuoteStatus::Pending,
            created_at,
        }
    }
}

fn required_field(
    value: Option<String>,
    field: &'static str,
    message: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match non_blank(value) {
        Some(v) => Some(v),
        None => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

/// Trim, mapping empty or whitespace-only strings to `None`.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Wire name of the offending field (camelCase).
    pub field: String,
    /// Human-readable message, shown next to the form field.
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: message.to_owned(),
        }
    }
}

/// Structured rejection of a quote request submission.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("invalid quote request ({} invalid fields)", .errors.len())]
pub struct ValidationError {
    /// One entry per invalid field.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Message for a given field, if it failed validation.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == name)
            .map(|e| e.message.as_str())
    }
}

/// An application account record (username + password).
///
/// Present in the data model for future authentication; no current
/// flow reads it. Usernames are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
}

/// Payload for creating a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
}
