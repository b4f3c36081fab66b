//! Domain model for owners, pets, appointments and medical history.
//!
//! # Responsibility
//! - Define the plain records returned across the core boundary.
//! - Own input validation shared by every write path.
//!
//! # Invariants
//! - Identifiers are store-assigned, start at 1 and are never reused.
//! - Dates are calendar values; canonical text form is `YYYY-MM-DD`.

pub mod appointment;
pub mod medical_record;
pub mod owner;
pub mod pet;
pub mod validation;
