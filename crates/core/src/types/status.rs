//! Quote request lifecycle status.

use serde::{Deserialize, Serialize};

/// Status of a quote request as it moves through the operator's inbox.
///
/// Stored as lowercase text in the database and on the wire. The typed
/// enum is the validity check for status updates: an unknown status
/// never reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// Freshly submitted, nobody has reached out yet.
    #[default]
    Pending,
    /// The operator has contacted the customer.
    Contacted,
    /// The job is done (or the inquiry is otherwise closed).
    Completed,
}

impl QuoteStatus {
    /// All known statuses, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Contacted, Self::Completed];

    /// Lowercase string form, matching the wire and database encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "contacted" => Ok(Self::Contacted),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("unknown quote status: {s}")),
        }
    }
}

// SQLx support (with postgres feature) - stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for QuoteStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for QuoteStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse::<Self>()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for QuoteStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        assert_eq!(QuoteStatus::default(), QuoteStatus::Pending);
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        for status in QuoteStatus::ALL {
            let back: QuoteStatus = status.to_string().parse().unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("archived".parse::<QuoteStatus>().is_err());
        assert!("Pending".parse::<QuoteStatus>().is_err());
        assert!("".parse::<QuoteStatus>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&QuoteStatus::Contacted).unwrap();
        assert_eq!(json, "\"contacted\"");

        let back: QuoteStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(back, QuoteStatus::Completed);
    }
}
