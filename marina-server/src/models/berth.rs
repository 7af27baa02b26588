//! Berth ("catway") records and their validated inputs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum length for the free-text condition of a berth
const MAX_STATE_LEN: usize = 256;

/// Condition recorded for a berth when none is supplied
pub const DEFAULT_BERTH_STATE: &str = "good";

/// Validated berth number (strictly positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BerthNumber(i32);

impl BerthNumber {
    pub fn new(n: i64) -> Result<Self, ValidationError> {
        if n <= 0 || n > i64::from(i32::MAX) {
            return Err(ValidationError::InvalidFormat {
                field: "catwayNumber",
                reason: "must be a positive integer",
            });
        }
        Ok(Self(n as i32))
    }

    /// Parse from a path segment or form field.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty {
                field: "catwayNumber",
            });
        }
        let n: i64 = s.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "catwayNumber",
            reason: "must be a positive integer",
        })?;
        Self::new(n)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for BerthNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Berth category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BerthKind {
    Long,
    #[default]
    Short,
}

impl BerthKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl FromStr for BerthKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "long" => Ok(Self::Long),
            "short" => Ok(Self::Short),
            other => Err(ValidationError::InvalidVariant {
                field: "catwayType",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for BerthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated berth condition text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BerthState(String);

impl BerthState {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: "catwayState",
            });
        }

        if trimmed.chars().count() > MAX_STATE_LEN {
            return Err(ValidationError::TooLong {
                field: "catwayState",
                max: MAX_STATE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for BerthState {
    fn default() -> Self {
        Self(DEFAULT_BERTH_STATE.to_owned())
    }
}

/// Berth record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Berth {
    pub catway_number: i32,
    pub catway_type: BerthKind,
    pub catway_state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for berth creation
#[derive(Debug, Clone)]
pub struct NewBerth {
    pub number: BerthNumber,
    pub kind: BerthKind,
    pub state: BerthState,
}

impl NewBerth {
    /// Validate raw create fields. Type and state fall back to their defaults when absent.
    pub fn parse(
        number: Option<i64>,
        kind: Option<&str>,
        state: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let number = number.ok_or(ValidationError::Empty {
            field: "catwayNumber",
        })?;
        let kind = match kind.map(str::trim) {
            None | Some("") => BerthKind::default(),
            Some(k) => k.parse()?,
        };
        let state = match state.map(str::trim) {
            None | Some("") => BerthState::default(),
            Some(s) => BerthState::new(s)?,
        };

        Ok(Self {
            number: BerthNumber::new(number)?,
            kind,
            state,
        })
    }
}
