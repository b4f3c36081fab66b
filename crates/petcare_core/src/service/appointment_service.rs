//! Appointment manager.
//!
//! # Responsibility
//! - Validate appointment input, including strict calendar dates.
//! - Expose per-pet date-partitioned queries and the owner-wide report.
//!
//! # Invariants
//! - The reference date is always supplied by the caller; nothing here reads
//!   the clock.
//! - `upcoming_for_pet` and `past_for_pet` partition `list_for_pet` for any
//!   reference date.
//! - `upcoming_for_owner` is deliberately not filtered by date.

use crate::model::appointment::{
    Appointment, AppointmentId, AppointmentPatch, NewAppointment, NextAppointment,
    OwnerAppointment,
};
use crate::model::owner::OwnerId;
use crate::model::pet::PetId;
use crate::model::validation::parse_iso_date;
use crate::repo::appointment_repo::AppointmentRepository;
use crate::repo::error::{ConstraintKind, EntityRef, RepoError};
use crate::service::error::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::info;

/// Request model for scheduling an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateAppointmentRequest {
    pub pet_id: PetId,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub reason: Option<String>,
    pub vet_name: Option<String>,
    pub notes: Option<String>,
}

/// Partial update request. Date text is validated like on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentUpdate {
    pub pet_id: Option<PetId>,
    pub date: Option<String>,
    pub reason: Option<Option<String>>,
    pub vet_name: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

/// Appointment use-case service.
pub struct AppointmentService<R: AppointmentRepository> {
    repo: R,
}

impl<R: AppointmentRepository> AppointmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create(&self, request: CreateAppointmentRequest) -> ServiceResult<Appointment> {
        let date = parse_iso_date("date", &request.date)?;
        let appointment = NewAppointment::new(
            request.pet_id,
            date,
            request.reason,
            request.vet_name,
            request.notes,
        )?;
        let id = self
            .repo
            .create_appointment(&appointment)
            .map_err(|err| missing_pet(err, Some(appointment.pet_id)))?;
        info!(
            "event=appointment_create module=service status=ok appointment_id={id} pet_id={}",
            appointment.pet_id
        );

        self.repo
            .get_appointment(id)?
            .ok_or(ServiceError::InconsistentState(
                "created appointment not found in read-back",
            ))
    }

    /// Applies only the supplied fields.
    pub fn update(&self, id: AppointmentId, update: AppointmentUpdate) -> ServiceResult<Appointment> {
        let date = update
            .date
            .as_deref()
            .map(|value| parse_iso_date("date", value))
            .transpose()?;
        let patch = AppointmentPatch {
            pet_id: update.pet_id,
            date,
            reason: update.reason,
            vet_name: update.vet_name,
            notes: update.notes,
        }
        .validated()?;

        self.repo
            .update_appointment(id, &patch)
            .map_err(|err| missing_pet(err, patch.pet_id))?;
        info!("event=appointment_update module=service status=ok appointment_id={id}");

        self.repo
            .get_appointment(id)?
            .ok_or(ServiceError::InconsistentState(
                "updated appointment not found in read-back",
            ))
    }

    pub fn delete(&self, id: AppointmentId) -> ServiceResult<()> {
        self.repo.delete_appointment(id)?;
        info!("event=appointment_delete module=service status=ok appointment_id={id}");
        Ok(())
    }

    pub fn get_by_id(&self, id: AppointmentId) -> ServiceResult<Option<Appointment>> {
        Ok(self.repo.get_appointment(id)?)
    }

    /// Full history for one pet, newest first.
    pub fn list_for_pet(&self, pet_id: PetId) -> ServiceResult<Vec<Appointment>> {
        Ok(self.repo.list_for_pet(pet_id)?)
    }

    /// Appointments on or after `as_of`, soonest first.
    pub fn upcoming_for_pet(
        &self,
        pet_id: PetId,
        as_of: NaiveDate,
    ) -> ServiceResult<Vec<Appointment>> {
        Ok(self.repo.upcoming_for_pet(pet_id, as_of)?)
    }

    /// Appointments before `as_of`, most recent first.
    pub fn past_for_pet(&self, pet_id: PetId, as_of: NaiveDate) -> ServiceResult<Vec<Appointment>> {
        Ok(self.repo.past_for_pet(pet_id, as_of)?)
    }

    pub fn next_for_pet(
        &self,
        pet_id: PetId,
        as_of: NaiveDate,
    ) -> ServiceResult<Option<NextAppointment>> {
        Ok(self.repo.next_for_pet(pet_id, as_of)?)
    }

    /// Every appointment of every pet the owner has, soonest first.
    pub fn upcoming_for_owner(&self, owner_id: OwnerId) -> ServiceResult<Vec<OwnerAppointment>> {
        Ok(self.repo.upcoming_for_owner(owner_id)?)
    }
}

pub(crate) fn missing_pet(err: RepoError, pet_id: Option<PetId>) -> ServiceError {
    match (err, pet_id) {
        (
            RepoError::Constraint {
                kind: ConstraintKind::ForeignKey,
                ..
            },
            Some(pet_id),
        ) => ServiceError::NotFound(EntityRef::Pet(pet_id)),
        (other, _) => other.into(),
    }
}
