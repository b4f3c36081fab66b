//! Manager-level error type shared by all services.
//!
//! # Invariants
//! - Every error is returned synchronously from the operation that detected
//!   it; none is retried.
//! - Store constraint failures are translated per operation, so callers only
//!   see validation, conflict, not-found and in-use outcomes for bad input.

use crate::model::owner::OwnerId;
use crate::model::pet::PetId;
use crate::model::validation::ValidationError;
use crate::repo::error::{EntityRef, RepoError};
use crate::repo::pet_repo::PetDependents;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by owner/pet/appointment/medical-record services.
#[derive(Debug)]
pub enum ServiceError {
    /// Missing, blank or malformed input.
    Validation(ValidationError),
    /// Uniqueness violation (owner contact).
    Conflict { field: &'static str, value: String },
    /// Target or referenced row does not exist.
    NotFound(EntityRef),
    /// Owner still has pets.
    OwnerHasPets { owner_id: OwnerId, pets: u32 },
    /// Pet still has appointments or medical history.
    PetInUse {
        pet_id: PetId,
        dependents: PetDependents,
    },
    /// Write succeeded but read-back disagrees.
    InconsistentState(&'static str),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict { field, value } => {
                write!(f, "{field} `{value}` is already in use")
            }
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::OwnerHasPets { owner_id, pets } => write!(
                f,
                "owner {owner_id} still has {pets} pet(s); reassign or delete them first"
            ),
            Self::PetInUse { pet_id, dependents } => write!(
                f,
                "pet {pet_id} still has {} appointment(s) and {} medical record(s)",
                dependents.appointments, dependents.medical_records
            ),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(entity) => Self::NotFound(entity),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}
