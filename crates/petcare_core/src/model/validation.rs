//! Input validation shared by model constructors and services.
//!
//! # Invariants
//! - Required text is non-empty after trim.
//! - Identifiers `<= 0` are treated as unset.
//! - Dates must be strict `YYYY-MM-DD` and name a real calendar day, so the
//!   stored text sorts in calendar order.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Canonical text form used for persisted dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Input rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is missing or blank.
    EmptyField(&'static str),
    /// Required identifier is missing (`<= 0`).
    UnsetId(&'static str),
    /// Date text is not a strict `YYYY-MM-DD` calendar date.
    InvalidDate { field: &'static str, value: String },
    /// Medical record kind outside the supported set.
    InvalidRecordKind(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::UnsetId(field) => write!(f, "{field} must be a positive identifier"),
            Self::InvalidDate { field, value } => {
                write!(f, "{field} must be a YYYY-MM-DD date, got `{value}`")
            }
            Self::InvalidRecordKind(value) => write!(
                f,
                "record kind must be vaccination|treatment, got `{value}`"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Trims required text and rejects blank values.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Rejects unset identifiers.
pub fn require_id(field: &'static str, id: i64) -> Result<i64, ValidationError> {
    if id <= 0 {
        return Err(ValidationError::UnsetId(field));
    }
    Ok(id)
}

/// Trims optional free text; blank input collapses to `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parses a strict ISO-8601 calendar date.
pub fn parse_iso_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    if !ISO_DATE_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidDate {
            field,
            value: trimmed.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: trimmed.to_string(),
    })
}

/// Formats a date in its canonical persisted form.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        format_iso_date, normalize_optional_text, parse_iso_date, require_id, require_text,
        ValidationError,
    };

    #[test]
    fn parse_iso_date_accepts_canonical_dates() {
        let date = parse_iso_date("date", " 2025-11-10 ").expect("valid date");
        assert_eq!(format_iso_date(date), "2025-11-10");
    }

    #[test]
    fn parse_iso_date_rejects_loose_and_impossible_dates() {
        for raw in ["2025-1-5", "2025-02-30", "10/11/2025", "2025-11-10T00:00"] {
            let err = parse_iso_date("date", raw).expect_err("date should be rejected");
            assert!(matches!(err, ValidationError::InvalidDate { field: "date", .. }));
        }
        assert_eq!(
            parse_iso_date("date", "  "),
            Err(ValidationError::EmptyField("date"))
        );
    }

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("name", "  Rex ").unwrap(), "Rex");
        assert_eq!(
            require_text("name", "\t"),
            Err(ValidationError::EmptyField("name"))
        );
    }

    #[test]
    fn require_id_rejects_unset_values() {
        assert_eq!(require_id("pet_id", 3).unwrap(), 3);
        assert_eq!(
            require_id("pet_id", 0),
            Err(ValidationError::UnsetId("pet_id"))
        );
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(normalize_optional_text(Some("   ".to_string())), None);
        assert_eq!(
            normalize_optional_text(Some(" Dr. Auma ".to_string())).as_deref(),
            Some("Dr. Auma")
        );
    }
}
