//! Owner records.
//!
//! # Invariants
//! - `name` and `contact` are non-empty after trim.
//! - `contact` is unique across owners; the store enforces it.

use crate::model::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned owner identifier.
pub type OwnerId = i64;

/// Person responsible for one or more pets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
    /// Phone number or e-mail. Unique across owners.
    pub contact: String,
}

/// Validated insert shape for an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOwner {
    pub name: String,
    pub contact: String,
}

impl NewOwner {
    /// Trims and validates owner input.
    pub fn new(name: &str, contact: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_text("name", name)?,
            contact: require_text("contact", contact)?,
        })
    }
}

/// Partial owner update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerPatch {
    pub name: Option<String>,
    pub contact: Option<String>,
}

impl OwnerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact.is_none()
    }

    /// Returns a trimmed copy, rejecting supplied blank values.
    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: self
                .name
                .map(|value| require_text("name", &value))
                .transpose()?,
            contact: self
                .contact
                .map(|value| require_text("contact", &value))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{NewOwner, OwnerPatch};
    use crate::model::validation::ValidationError;

    #[test]
    fn new_owner_trims_fields() {
        let owner = NewOwner::new(" Alice Johnson ", " 0710000001").unwrap();
        assert_eq!(owner.name, "Alice Johnson");
        assert_eq!(owner.contact, "0710000001");
    }

    #[test]
    fn new_owner_requires_contact() {
        assert_eq!(
            NewOwner::new("Alice", ""),
            Err(ValidationError::EmptyField("contact"))
        );
    }

    #[test]
    fn patch_rejects_supplied_blank_name_only() {
        let untouched = OwnerPatch::default().validated().unwrap();
        assert!(untouched.is_empty());

        let err = OwnerPatch {
            name: Some(" ".to_string()),
            contact: None,
        }
        .validated()
        .unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("name"));
    }
}
