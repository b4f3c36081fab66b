//! Entity managers.
//!
//! # Responsibility
//! - Validate input and orchestrate repository calls into use-case APIs.
//! - Keep callers decoupled from storage details: only plain records and
//!   `ServiceError` cross this boundary.
//!
//! # Invariants
//! - No service calls another service; cross-entity reads are repository
//!   joins.

pub mod appointment_service;
pub mod error;
pub mod medical_service;
pub mod owner_service;
pub mod pet_service;
