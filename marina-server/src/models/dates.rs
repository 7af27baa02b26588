//! Calendar dates and reservation date ranges
//!
//! Reservations are stored at date granularity. Inputs may be plain
//! `YYYY-MM-DD` dates or full ISO-8601 timestamps; timestamps are reduced
//! to their calendar date (RFC 3339 offsets are normalised to UTC first).

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Parse an ISO-8601 date or timestamp into a calendar date.
///
/// # Example
/// ```
/// use marina_server::models::parse_date;
///
/// assert!(parse_date("startDate", "2024-06-01").is_ok());
/// assert!(parse_date("startDate", "2024-06-01T08:30:00Z").is_ok());
/// assert!(parse_date("startDate", "June 1st").is_err());
/// ```
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc).date_naive());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts.date());
        }
    }

    Err(ValidationError::InvalidFormat {
        field,
        reason: "must be an ISO-8601 date (YYYY-MM-DD)",
    })
}

/// Parse an optional date field. Absent and blank values both mean "not supplied".
pub fn parse_optional_date(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(field, s).map(Some),
    }
}

/// End date is not strictly after the start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("end date {end} must be after start date {start}")]
pub struct InvalidDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A closed date range `[start, end]` with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `end <= start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateRange> {
        if end <= start {
            return Err(InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `day` falls inside the range, endpoints included.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(parse_date("startDate", "2024-06-01").unwrap(), d("2024-06-01"));
        assert_eq!(parse_date("startDate", " 2024-06-01 ").unwrap(), d("2024-06-01"));
    }

    #[test]
    fn parses_timestamps_to_their_date() {
        assert_eq!(
            parse_date("startDate", "2024-06-01T23:15:00Z").unwrap(),
            d("2024-06-01")
        );
        assert_eq!(
            parse_date("startDate", "2024-06-02T01:00:00+02:00").unwrap(),
            d("2024-06-01")
        );
        assert_eq!(
            parse_date("startDate", "2024-06-01T10:00").unwrap(),
            d("2024-06-01")
        );
        assert_eq!(
            parse_date("startDate", "2024-06-01T10:00:00.000").unwrap(),
            d("2024-06-01")
        );
    }

    #[test]
    fn rejects_garbage_and_blank() {
        assert!(matches!(
            parse_date("endDate", "tomorrow"),
            Err(ValidationError::InvalidFormat { field: "endDate", .. })
        ));
        assert!(matches!(
            parse_date("endDate", "  "),
            Err(ValidationError::Empty { field: "endDate" })
        ));
        assert!(parse_date("endDate", "2024-02-30").is_err());
    }

    #[test]
    fn optional_blank_is_absent() {
        assert_eq!(parse_optional_date("startDate", None).unwrap(), None);
        assert_eq!(parse_optional_date("startDate", Some("")).unwrap(), None);
        assert_eq!(
            parse_optional_date("startDate", Some("2024-06-01")).unwrap(),
            Some(d("2024-06-01"))
        );
    }

    #[test]
    fn range_requires_end_after_start() {
        assert!(DateRange::new(d("2024-09-01"), d("2024-09-02")).is_ok());

        let err = DateRange::new(d("2024-09-10"), d("2024-09-05")).unwrap_err();
        assert_eq!(err.start, d("2024-09-10"));

        // same-day range is not "strictly after"
        assert!(DateRange::new(d("2024-09-10"), d("2024-09-10")).is_err());
    }

    #[test]
    fn contains_is_inclusive() {
        let range = DateRange::new(d("2024-06-01"), d("2024-06-10")).unwrap();
        assert!(range.contains(d("2024-06-01")));
        assert!(range.contains(d("2024-06-10")));
        assert!(!range.contains(d("2024-06-11")));
    }
}
