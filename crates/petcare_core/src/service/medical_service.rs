//! Medical-record manager.
//!
//! # Invariants
//! - Records are append/delete only; no update operation exists.
//! - Listings are newest first.

use crate::model::medical_record::{MedicalRecord, MedicalRecordId, NewMedicalRecord, RecordKind};
use crate::model::owner::OwnerId;
use crate::model::pet::PetId;
use crate::model::validation::parse_iso_date;
use crate::repo::medical_repo::MedicalRecordRepository;
use crate::service::appointment_service::missing_pet;
use crate::service::error::{ServiceError, ServiceResult};
use log::info;

/// Request model for adding a vaccination or treatment entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMedicalRecordRequest {
    pub pet_id: PetId,
    pub kind: RecordKind,
    /// Vaccine or treatment label.
    pub name: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub notes: Option<String>,
}

/// Medical history use-case service.
pub struct MedicalRecordService<R: MedicalRecordRepository> {
    repo: R,
}

impl<R: MedicalRecordRepository> MedicalRecordService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create(&self, request: CreateMedicalRecordRequest) -> ServiceResult<MedicalRecord> {
        let date = parse_iso_date("date", &request.date)?;
        let record = NewMedicalRecord::new(
            request.pet_id,
            request.kind,
            &request.name,
            date,
            request.notes,
        )?;
        let id = self
            .repo
            .create_record(&record)
            .map_err(|err| missing_pet(err, Some(record.pet_id)))?;
        info!(
            "event=medical_record_create module=service status=ok record_id={id} pet_id={} kind={}",
            record.pet_id, record.kind
        );

        self.repo
            .get_record(id)?
            .ok_or(ServiceError::InconsistentState(
                "created medical record not found in read-back",
            ))
    }

    pub fn delete(&self, id: MedicalRecordId) -> ServiceResult<()> {
        self.repo.delete_record(id)?;
        info!("event=medical_record_delete module=service status=ok record_id={id}");
        Ok(())
    }

    pub fn get_by_id(&self, id: MedicalRecordId) -> ServiceResult<Option<MedicalRecord>> {
        Ok(self.repo.get_record(id)?)
    }

    pub fn list_for_pet(&self, pet_id: PetId) -> ServiceResult<Vec<MedicalRecord>> {
        Ok(self.repo.list_for_pet(pet_id)?)
    }

    /// History across all pets of one owner.
    pub fn list_for_owner(&self, owner_id: OwnerId) -> ServiceResult<Vec<MedicalRecord>> {
        Ok(self.repo.list_for_owner(owner_id)?)
    }
}
