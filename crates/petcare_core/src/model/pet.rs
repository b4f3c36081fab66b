//! Pet records.
//!
//! # Invariants
//! - `name` and `species` are non-empty after trim.
//! - `owner_id`, when set, references an existing owner (store foreign key).
//! - Field order is name/species/breed/age/owner everywhere.

use crate::model::owner::OwnerId;
use crate::model::validation::{normalize_optional_text, require_id, require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned pet identifier.
pub type PetId = i64;

/// Animal tracked by the practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    /// Age in whole years.
    pub age: Option<u32>,
    pub owner_id: Option<OwnerId>,
}

/// Validated insert shape for a pet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub owner_id: Option<OwnerId>,
}

impl NewPet {
    pub fn new(
        name: &str,
        species: &str,
        breed: Option<String>,
        age: Option<u32>,
        owner_id: Option<OwnerId>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_text("name", name)?,
            species: require_text("species", species)?,
            breed: normalize_optional_text(breed),
            age,
            owner_id: owner_id.map(|id| require_id("owner_id", id)).transpose()?,
        })
    }
}

/// Partial pet update.
///
/// Outer `None` leaves a field unchanged; `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetPatch {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<Option<String>>,
    pub age: Option<Option<u32>>,
    pub owner_id: Option<Option<OwnerId>>,
}

impl PetPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.species.is_none()
            && self.breed.is_none()
            && self.age.is_none()
            && self.owner_id.is_none()
    }

    pub fn validated(self) -> Result<Self, ValidationError> {
        let owner_id = match self.owner_id {
            Some(Some(id)) => Some(Some(require_id("owner_id", id)?)),
            other => other,
        };
        Ok(Self {
            name: self
                .name
                .map(|value| require_text("name", &value))
                .transpose()?,
            species: self
                .species
                .map(|value| require_text("species", &value))
                .transpose()?,
            breed: self.breed.map(normalize_optional_text),
            age: self.age,
            owner_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{NewPet, PetPatch};
    use crate::model::validation::ValidationError;

    #[test]
    fn new_pet_requires_name_and_species() {
        assert_eq!(
            NewPet::new("", "Dog", None, None, None),
            Err(ValidationError::EmptyField("name"))
        );
        assert_eq!(
            NewPet::new("Buddy", " ", None, None, None),
            Err(ValidationError::EmptyField("species"))
        );
    }

    #[test]
    fn new_pet_collapses_blank_breed() {
        let pet = NewPet::new("Buddy", "Dog", Some(String::new()), Some(4), Some(1)).unwrap();
        assert_eq!(pet.breed, None);
        assert_eq!(pet.age, Some(4));
    }

    #[test]
    fn patch_keeps_explicit_clear() {
        let patch = PetPatch {
            owner_id: Some(None),
            ..PetPatch::default()
        }
        .validated()
        .unwrap();
        assert_eq!(patch.owner_id, Some(None));
        assert!(!patch.is_empty());
    }
}
