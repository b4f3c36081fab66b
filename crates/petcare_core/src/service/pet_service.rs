//! Pet manager.
//!
//! # Responsibility
//! - Validate pet input and owner references.
//! - Refuse deletion while appointments or medical history reference the pet.
//!
//! # Invariants
//! - Dependency check and delete are one atomic store operation
//!   (`ON DELETE RESTRICT`); dependent counts are only read to explain a
//!   refusal.

use crate::model::owner::OwnerId;
use crate::model::pet::{NewPet, Pet, PetId, PetPatch};
use crate::repo::error::{ConstraintKind, EntityRef, RepoError};
use crate::repo::pet_repo::{PetDependents, PetRepository};
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};

/// Request model for registering a pet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePetRequest {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub owner_id: Option<OwnerId>,
}

/// Pet use-case service.
pub struct PetService<R: PetRepository> {
    repo: R,
}

impl<R: PetRepository> PetService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create(&self, request: CreatePetRequest) -> ServiceResult<Pet> {
        let pet = NewPet::new(
            &request.name,
            &request.species,
            request.breed,
            request.age,
            request.owner_id,
        )?;
        let id = self
            .repo
            .create_pet(&pet)
            .map_err(|err| missing_owner(err, pet.owner_id))?;
        info!("event=pet_create module=service status=ok pet_id={id}");

        self.repo
            .get_pet(id)?
            .ok_or(ServiceError::InconsistentState(
                "created pet not found in read-back",
            ))
    }

    /// Applies only the supplied fields.
    pub fn update(&self, id: PetId, patch: PetPatch) -> ServiceResult<Pet> {
        let patch = patch.validated()?;
        self.repo
            .update_pet(id, &patch)
            .map_err(|err| missing_owner(err, patch.owner_id.flatten()))?;
        info!("event=pet_update module=service status=ok pet_id={id}");

        self.repo
            .get_pet(id)?
            .ok_or(ServiceError::InconsistentState(
                "updated pet not found in read-back",
            ))
    }

    /// Deletes a pet that has no appointments or medical history.
    pub fn delete(&self, id: PetId) -> ServiceResult<()> {
        match self.repo.delete_pet(id) {
            Ok(()) => {
                info!("event=pet_delete module=service status=ok pet_id={id}");
                Ok(())
            }
            Err(RepoError::Constraint {
                kind: ConstraintKind::ForeignKey,
                ..
            }) => {
                let dependents = self.repo.count_dependents(id)?;
                warn!(
                    "event=pet_delete module=service status=rejected pet_id={id} appointments={} medical_records={}",
                    dependents.appointments, dependents.medical_records
                );
                Err(ServiceError::PetInUse {
                    pet_id: id,
                    dependents,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Rows that would block deleting the pet.
    pub fn dependents(&self, id: PetId) -> ServiceResult<PetDependents> {
        if self.repo.get_pet(id)?.is_none() {
            return Err(ServiceError::NotFound(EntityRef::Pet(id)));
        }
        Ok(self.repo.count_dependents(id)?)
    }

    pub fn get_by_id(&self, id: PetId) -> ServiceResult<Option<Pet>> {
        Ok(self.repo.get_pet(id)?)
    }

    pub fn list_all(&self) -> ServiceResult<Vec<Pet>> {
        Ok(self.repo.list_pets()?)
    }

    pub fn find_by_owner(&self, owner_id: OwnerId) -> ServiceResult<Vec<Pet>> {
        Ok(self.repo.find_pets_by_owner(owner_id)?)
    }

    /// Substring search on pet name. No match yields an empty list.
    pub fn find_by_name_substring(&self, query: &str) -> ServiceResult<Vec<Pet>> {
        Ok(self.repo.find_pets_by_name(query.trim())?)
    }
}

fn missing_owner(err: RepoError, owner_id: Option<OwnerId>) -> ServiceError {
    match (err, owner_id) {
        (
            RepoError::Constraint {
                kind: ConstraintKind::ForeignKey,
                ..
            },
            Some(owner_id),
        ) => ServiceError::NotFound(EntityRef::Owner(owner_id)),
        (other, _) => other.into(),
    }
}
