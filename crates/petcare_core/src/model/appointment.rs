//! Appointment records and read models for date-partitioned queries.
//!
//! # Invariants
//! - `pet_id` references an existing pet (store foreign key).
//! - Upcoming means `date >= as_of`; past means `date < as_of`.

use crate::model::pet::PetId;
use crate::model::validation::{normalize_optional_text, require_id, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned appointment identifier.
pub type AppointmentId = i64;

/// Scheduled or past veterinary visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub pet_id: PetId,
    pub date: NaiveDate,
    pub reason: Option<String>,
    pub vet_name: Option<String>,
    pub notes: Option<String>,
}

/// Validated insert shape for an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub pet_id: PetId,
    pub date: NaiveDate,
    pub reason: Option<String>,
    pub vet_name: Option<String>,
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn new(
        pet_id: PetId,
        date: NaiveDate,
        reason: Option<String>,
        vet_name: Option<String>,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            pet_id: require_id("pet_id", pet_id)?,
            date,
            reason: normalize_optional_text(reason),
            vet_name: normalize_optional_text(vet_name),
            notes: normalize_optional_text(notes),
        })
    }
}

/// Partial appointment update. Nullable text uses `Option<Option<_>>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub pet_id: Option<PetId>,
    pub date: Option<NaiveDate>,
    pub reason: Option<Option<String>>,
    pub vet_name: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl AppointmentPatch {
    pub fn is_empty(&self) -> bool {
        self.pet_id.is_none()
            && self.date.is_none()
            && self.reason.is_none()
            && self.vet_name.is_none()
            && self.notes.is_none()
    }

    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            pet_id: self
                .pet_id
                .map(|id| require_id("pet_id", id))
                .transpose()?,
            date: self.date,
            reason: self.reason.map(normalize_optional_text),
            vet_name: self.vet_name.map(normalize_optional_text),
            notes: self.notes.map(normalize_optional_text),
        })
    }
}

/// Soonest upcoming appointment for one pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextAppointment {
    pub id: AppointmentId,
    pub date: NaiveDate,
}

/// One row of the owner-wide appointment report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAppointment {
    pub appointment_id: AppointmentId,
    pub pet_name: String,
    pub date: NaiveDate,
}
