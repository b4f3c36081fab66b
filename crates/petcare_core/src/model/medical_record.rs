//! Medical history entries (vaccinations and treatments).
//!
//! # Invariants
//! - `kind` is one of the closed `RecordKind` variants.
//! - Records are append/delete only; there is no update path.

use crate::model::pet::PetId;
use crate::model::validation::{normalize_optional_text, require_id, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned medical record identifier.
pub type MedicalRecordId = i64;

/// Category of a medical history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Vaccination,
    Treatment,
}

impl RecordKind {
    /// Persisted/display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vaccination => "vaccination",
            Self::Treatment => "treatment",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ValidationError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vaccination" => Ok(Self::Vaccination),
            "treatment" => Ok(Self::Treatment),
            "" => Err(ValidationError::EmptyField("record_kind")),
            _ => Err(ValidationError::InvalidRecordKind(value.trim().to_string())),
        }
    }
}

/// Vaccination or treatment entry in a pet's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: MedicalRecordId,
    pub pet_id: PetId,
    #[serde(rename = "record_type")]
    pub kind: RecordKind,
    /// Vaccine or treatment label.
    pub name: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Validated insert shape for a medical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedicalRecord {
    pub pet_id: PetId,
    pub kind: RecordKind,
    pub name: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl NewMedicalRecord {
    pub fn new(
        pet_id: PetId,
        kind: RecordKind,
        name: &str,
        date: NaiveDate,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            pet_id: require_id("pet_id", pet_id)?,
            kind,
            name: name.trim().to_string(),
            date,
            notes: normalize_optional_text(notes),
        })
    }
}
