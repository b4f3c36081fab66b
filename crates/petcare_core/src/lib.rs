//! Core record keeping for PetCare.
//! This crate owns the store schema and every business invariant: owners,
//! pets, appointments and medical history.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::{LogConfig, StoreConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::appointment::{
    Appointment, AppointmentId, AppointmentPatch, NewAppointment, NextAppointment,
    OwnerAppointment,
};
pub use model::medical_record::{MedicalRecord, MedicalRecordId, NewMedicalRecord, RecordKind};
pub use model::owner::{NewOwner, Owner, OwnerId, OwnerPatch};
pub use model::pet::{NewPet, Pet, PetId, PetPatch};
pub use model::validation::{format_iso_date, parse_iso_date, ValidationError};
pub use repo::appointment_repo::{AppointmentRepository, SqliteAppointmentRepository};
pub use repo::error::{ConstraintKind, EntityRef, RepoError, RepoResult};
pub use repo::medical_repo::{MedicalRecordRepository, SqliteMedicalRecordRepository};
pub use repo::owner_repo::{OwnerRepository, SqliteOwnerRepository};
pub use repo::pet_repo::{PetDependents, PetRepository, SqlitePetRepository};
pub use service::appointment_service::{
    AppointmentService, AppointmentUpdate, CreateAppointmentRequest,
};
pub use service::error::{ServiceError, ServiceResult};
pub use service::medical_service::{CreateMedicalRecordRequest, MedicalRecordService};
pub use service::owner_service::OwnerService;
pub use service::pet_service::{CreatePetRequest, PetService};
pub use seed::{seed_sample_data, SeedError, SeedSummary};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
