//! Seed demo quote requests.
//!
//! Gives the admin dashboard something to render during development.
//! Safe to run repeatedly; every run inserts a fresh batch.

use chrono::Utc;
use welcome_home_core::{NewQuoteRequest, QuoteRequestId, QuoteRequestInput};

use super::CliError;

fn demo_inputs() -> Vec<QuoteRequestInput> {
    vec![
        QuoteRequestInput {
            first_name: Some("Maria".into()),
            last_name: Some("Gonzalez".into()),
            phone: Some("9405550114".into()),
            email: Some("maria.gonzalez@example.com".into()),
            address: Some("214 Bluestem Dr".into()),
            city: Some("Aubrey".into()),
            state: Some("TX".into()),
            zip: Some("76227".into()),
            services: vec!["Lawn Care".into(), "Power Washing".into()],
            description: Some("Front walkway and driveway need washing before listing.".into()),
        },
        QuoteRequestInput {
            first_name: Some("Dale".into()),
            last_name: Some("Whitfield".into()),
            phone: Some("4695550171".into()),
            email: Some("dale.w@example.com".into()),
            address: Some("98 Prairie View Ct".into()),
            city: None,
            state: None,
            zip: None,
            services: vec!["Landscaping".into()],
            description: None,
        },
        QuoteRequestInput {
            first_name: Some("Priya".into()),
            last_name: Some("Natarajan".into()),
            phone: Some("2145550198".into()),
            email: Some("priya.n@example.com".into()),
            address: Some("1501 Winding Creek Rd".into()),
            city: Some("Pilot Point".into()),
            state: Some("TX".into()),
            zip: Some("76258".into()),
            services: vec!["Fence Staining".into(), "Power Washing".into()],
            description: Some("Back fence, about 180 linear feet.".into()),
        },
    ]
}

/// Insert a batch of demo quote requests.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    let mut inserted = 0usize;
    for input in demo_inputs() {
        let new = NewQuoteRequest::validate(input)
            .map_err(|e| CliError::InvalidInput(e.to_string()))?;
        let record = new.into_record(QuoteRequestId::generate(), Utc::now());

        sqlx::query(
            "INSERT INTO quote_requests
                 (id, first_name, last_name, phone, email, address, city, state, zip,
                  services, description, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
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
        .execute(&pool)
        .await?;
        inserted += 1;
    }

    tracing::info!(inserted, "Seeded demo quote requests");
    Ok(())
}
