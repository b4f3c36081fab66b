//! Owner manager.
//!
//! # Responsibility
//! - Validate owner input and translate store constraints into
//!   conflict/in-use outcomes.
//!
//! # Invariants
//! - A rejected create or update leaves the store unchanged.
//! - Deletion is refused while any pet references the owner.

use crate::model::owner::{NewOwner, Owner, OwnerId, OwnerPatch};
use crate::repo::error::{ConstraintKind, EntityRef, RepoError};
use crate::repo::owner_repo::OwnerRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};

/// Owner use-case service.
pub struct OwnerService<R: OwnerRepository> {
    repo: R,
}

impl<R: OwnerRepository> OwnerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an owner with a unique contact.
    pub fn create(&self, name: &str, contact: &str) -> ServiceResult<Owner> {
        let owner = NewOwner::new(name, contact)?;
        let id = self
            .repo
            .create_owner(&owner)
            .map_err(|err| contact_conflict(err, &owner.contact))?;
        info!("event=owner_create module=service status=ok owner_id={id}");

        self.repo
            .get_owner(id)?
            .ok_or(ServiceError::InconsistentState(
                "created owner not found in read-back",
            ))
    }

    /// Applies only the supplied fields.
    pub fn update(&self, id: OwnerId, patch: OwnerPatch) -> ServiceResult<Owner> {
        let patch = patch.validated()?;
        self.repo.update_owner(id, &patch).map_err(|err| match &patch.contact {
            Some(contact) => contact_conflict(err, contact),
            None => err.into(),
        })?;
        info!("event=owner_update module=service status=ok owner_id={id}");

        self.repo
            .get_owner(id)?
            .ok_or(ServiceError::InconsistentState(
                "updated owner not found in read-back",
            ))
    }

    /// Deletes an owner that no pet references.
    pub fn delete(&self, id: OwnerId) -> ServiceResult<()> {
        match self.repo.delete_owner(id) {
            Ok(()) => {
                info!("event=owner_delete module=service status=ok owner_id={id}");
                Ok(())
            }
            Err(RepoError::Constraint {
                kind: ConstraintKind::ForeignKey,
                ..
            }) => {
                let pets = self.repo.count_pets(id)?;
                warn!("event=owner_delete module=service status=rejected owner_id={id} pets={pets}");
                Err(ServiceError::OwnerHasPets { owner_id: id, pets })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn get_by_id(&self, id: OwnerId) -> ServiceResult<Option<Owner>> {
        Ok(self.repo.get_owner(id)?)
    }

    pub fn list_all(&self) -> ServiceResult<Vec<Owner>> {
        Ok(self.repo.list_owners()?)
    }

    /// Substring search on owner name. No match yields an empty list.
    pub fn find_by_name_substring(&self, query: &str) -> ServiceResult<Vec<Owner>> {
        Ok(self.repo.find_owners_by_name(query.trim())?)
    }

    pub fn find_by_contact(&self, contact: &str) -> ServiceResult<Option<Owner>> {
        Ok(self.repo.find_owner_by_contact(contact.trim())?)
    }

    /// Number of pets currently linked to the owner.
    pub fn pet_count(&self, id: OwnerId) -> ServiceResult<u32> {
        if self.repo.get_owner(id)?.is_none() {
            return Err(ServiceError::NotFound(EntityRef::Owner(id)));
        }
        Ok(self.repo.count_pets(id)?)
    }
}

fn contact_conflict(err: RepoError, contact: &str) -> ServiceError {
    match err {
        RepoError::Constraint {
            kind: ConstraintKind::Unique,
            ..
        } => {
            warn!("event=owner_write module=service status=rejected reason=contact_conflict");
            ServiceError::Conflict {
                field: "contact",
                value: contact.to_string(),
            }
        }
        other => other.into(),
    }
}
