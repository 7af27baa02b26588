//! Reservation records, validated create input and partial updates

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::dates::{parse_date, parse_optional_date, DateRange};
use super::{BerthNumber, ValidationError};

/// Maximum length for client and boat names
const MAX_NAME_LEN: usize = 128;

/// Validated, trimmed, non-empty client or boat name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyName(String);

impl PartyName {
    /// Create a new name for `field`.
    ///
    /// # Example
    /// ```
    /// use marina_server::models::PartyName;
    ///
    /// assert!(PartyName::new("clientName", "Ada").is_ok());
    /// assert!(PartyName::new("clientName", "   ").is_err());
    /// ```
    pub fn new(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field });
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field,
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    fn optional(field: &'static str, s: Option<&str>) -> Result<Option<Self>, ValidationError> {
        s.map(|s| Self::new(field, s)).transpose()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Reservation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub catway_number: i32,
    pub client_name: String,
    pub boat_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Stored dates as a range. Stored records always satisfy `end > start`.
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.start_date, self.end_date)
    }
}

/// Raw create fields, dates not yet checked against each other.
#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub berth: BerthNumber,
    pub client_name: PartyName,
    pub boat_name: PartyName,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReservationRequest {
    /// Validate the required create fields.
    pub fn parse(
        berth: BerthNumber,
        client_name: Option<&str>,
        boat_name: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let client_name = PartyName::new("clientName", client_name.unwrap_or_default())?;
        let boat_name = PartyName::new("boatName", boat_name.unwrap_or_default())?;
        let start = parse_date("startDate", start.unwrap_or_default())?;
        let end = parse_date("endDate", end.unwrap_or_default())?;

        Ok(Self {
            berth,
            client_name,
            boat_name,
            start,
            end,
        })
    }
}

/// Fully validated reservation ready to insert
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub berth: BerthNumber,
    pub client_name: PartyName,
    pub boat_name: PartyName,
    pub range: DateRange,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ReservationPatch {
    pub client_name: Option<PartyName>,
    pub boat_name: Option<PartyName>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ReservationPatch {
    /// Validate whichever fields are present. Blank dates count as absent.
    pub fn parse(
        client_name: Option<&str>,
        boat_name: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            client_name: PartyName::optional("clientName", client_name)?,
            boat_name: PartyName::optional("boatName", boat_name)?,
            start: parse_optional_date("startDate", start)?,
            end: parse_optional_date("endDate", end)?,
        })
    }

    /// Effective `(start, end)` once missing dates are taken from `existing`.
    pub fn resolve_dates(&self, existing: &Reservation) -> (NaiveDate, NaiveDate) {
        (
            self.start.unwrap_or(existing.start_date),
            self.end.unwrap_or(existing.end_date),
        )
    }
}

/// Complete field set written back on update
#[derive(Debug, Clone)]
pub struct ReservationUpdate {
    pub client_name: String,
    pub boat_name: String,
    pub range: DateRange,
}
