//! Sample data for demos and manual testing.
//!
//! # Invariants
//! - Only an empty store (no owners) is seeded.
//! - All rows go through the services, so seeded data obeys the same
//!   validation as user input.
//! - Seeding is one transaction: either every row lands or none does.
//! - Dates are relative to the caller-supplied `today`.

use crate::model::medical_record::RecordKind;
use crate::model::validation::format_iso_date;
use crate::repo::appointment_repo::SqliteAppointmentRepository;
use crate::repo::error::RepoError;
use crate::repo::medical_repo::SqliteMedicalRecordRepository;
use crate::repo::owner_repo::{OwnerRepository, SqliteOwnerRepository};
use crate::repo::pet_repo::SqlitePetRepository;
use crate::service::appointment_service::{AppointmentService, CreateAppointmentRequest};
use crate::service::error::ServiceError;
use crate::service::medical_service::{CreateMedicalRecordRequest, MedicalRecordService};
use crate::service::owner_service::OwnerService;
use crate::service::pet_service::{CreatePetRequest, PetService};
use chrono::{Duration, NaiveDate};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

struct SeedAppointment {
    offset_days: i64,
    reason: &'static str,
    vet_name: &'static str,
    notes: &'static str,
}

struct SeedRecord {
    kind: RecordKind,
    name: &'static str,
    offset_days: i64,
    notes: &'static str,
}

struct SeedPet {
    name: &'static str,
    species: &'static str,
    breed: &'static str,
    age: u32,
    appointments: &'static [SeedAppointment],
    records: &'static [SeedRecord],
}

struct SeedOwner {
    name: &'static str,
    contact: &'static str,
    pets: &'static [SeedPet],
}

const SAMPLE_OWNERS: &[SeedOwner] = &[
    SeedOwner {
        name: "Alice Johnson",
        contact: "0710000001",
        pets: &[
            SeedPet {
                name: "Buddy",
                species: "Dog",
                breed: "Beagle",
                age: 4,
                appointments: &[
                    SeedAppointment {
                        offset_days: 7,
                        reason: "Vaccination",
                        vet_name: "Dr. Kilonzo",
                        notes: "Rabies booster",
                    },
                    SeedAppointment {
                        offset_days: -60,
                        reason: "Checkup",
                        vet_name: "Dr. Kilonzo",
                        notes: "Weight OK",
                    },
                ],
                records: &[SeedRecord {
                    kind: RecordKind::Vaccination,
                    name: "Rabies",
                    offset_days: -365,
                    notes: "Initial dose",
                }],
            },
            SeedPet {
                name: "Mittens",
                species: "Cat",
                breed: "Domestic Shorthair",
                age: 2,
                appointments: &[SeedAppointment {
                    offset_days: 14,
                    reason: "Spay follow-up",
                    vet_name: "Dr. Auma",
                    notes: "Stitches check",
                }],
                records: &[SeedRecord {
                    kind: RecordKind::Treatment,
                    name: "Flea treatment",
                    offset_days: -30,
                    notes: "Topical",
                }],
            },
        ],
    },
    SeedOwner {
        name: "Brian Otieno",
        contact: "0710000002",
        pets: &[
            SeedPet {
                name: "Rocky",
                species: "Dog",
                breed: "German Shepherd",
                age: 6,
                appointments: &[
                    SeedAppointment {
                        offset_days: 3,
                        reason: "Hip assessment",
                        vet_name: "Dr. Auma",
                        notes: "Bring previous x-rays",
                    },
                    SeedAppointment {
                        offset_days: -120,
                        reason: "Dental cleaning",
                        vet_name: "Dr. Kilonzo",
                        notes: "Two extractions",
                    },
                ],
                records: &[
                    SeedRecord {
                        kind: RecordKind::Vaccination,
                        name: "DHPP",
                        offset_days: -200,
                        notes: "Annual booster",
                    },
                    SeedRecord {
                        kind: RecordKind::Treatment,
                        name: "Deworming",
                        offset_days: -45,
                        notes: "Oral",
                    },
                ],
            },
            SeedPet {
                name: "Kiwi",
                species: "Bird",
                breed: "African Grey",
                age: 1,
                appointments: &[SeedAppointment {
                    offset_days: 30,
                    reason: "Wing clipping",
                    vet_name: "Dr. Mwangi",
                    notes: "",
                }],
                records: &[],
            },
            SeedPet {
                name: "Luna",
                species: "Cat",
                breed: "Siamese",
                age: 3,
                appointments: &[SeedAppointment {
                    offset_days: -10,
                    reason: "Skin irritation",
                    vet_name: "Dr. Mwangi",
                    notes: "Prescribed cream",
                }],
                records: &[SeedRecord {
                    kind: RecordKind::Treatment,
                    name: "Antifungal cream",
                    offset_days: -10,
                    notes: "Apply twice daily",
                }],
            },
        ],
    },
    SeedOwner {
        name: "Carol Wanjiku",
        contact: "0710000003",
        pets: &[
            SeedPet {
                name: "Max",
                species: "Dog",
                breed: "Labrador",
                age: 5,
                appointments: &[SeedAppointment {
                    offset_days: 21,
                    reason: "Annual checkup",
                    vet_name: "Dr. Kilonzo",
                    notes: "",
                }],
                records: &[SeedRecord {
                    kind: RecordKind::Vaccination,
                    name: "Leptospirosis",
                    offset_days: -90,
                    notes: "",
                }],
            },
            SeedPet {
                name: "Coco",
                species: "Rabbit",
                breed: "Holland Lop",
                age: 2,
                appointments: &[SeedAppointment {
                    offset_days: -5,
                    reason: "Nail trim",
                    vet_name: "Dr. Auma",
                    notes: "",
                }],
                records: &[],
            },
        ],
    },
];

/// Row counts inserted by [`seed_sample_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub owners: usize,
    pub pets: usize,
    pub appointments: usize,
    pub medical_records: usize,
}

#[derive(Debug)]
pub enum SeedError {
    /// The store already holds owners.
    StoreNotEmpty,
    Service(ServiceError),
    Repo(RepoError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreNotEmpty => write!(f, "store already contains owners; refusing to seed"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreNotEmpty => None,
            Self::Service(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ServiceError> for SeedError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for SeedError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for SeedError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Populates an empty store with three owners and their pets, appointments
/// on both sides of `today`, and medical history.
pub fn seed_sample_data(conn: &Connection, today: NaiveDate) -> Result<SeedSummary, SeedError> {
    let tx = conn.unchecked_transaction()?;
    let owner_repo = SqliteOwnerRepository::try_new(&tx)?;
    if !owner_repo.list_owners()?.is_empty() {
        return Err(SeedError::StoreNotEmpty);
    }

    let owners = OwnerService::new(owner_repo);
    let pets = PetService::new(SqlitePetRepository::try_new(&tx)?);
    let appointments = AppointmentService::new(SqliteAppointmentRepository::try_new(&tx)?);
    let records = MedicalRecordService::new(SqliteMedicalRecordRepository::try_new(&tx)?);
    let mut summary = SeedSummary::default();

    for seed_owner in SAMPLE_OWNERS {
        let owner = owners.create(seed_owner.name, seed_owner.contact)?;
        summary.owners += 1;

        for seed_pet in seed_owner.pets {
            let pet = pets.create(CreatePetRequest {
                name: seed_pet.name.to_string(),
                species: seed_pet.species.to_string(),
                breed: Some(seed_pet.breed.to_string()),
                age: Some(seed_pet.age),
                owner_id: Some(owner.id),
            })?;
            summary.pets += 1;

            for seed_appointment in seed_pet.appointments {
                appointments.create(CreateAppointmentRequest {
                    pet_id: pet.id,
                    date: shifted(today, seed_appointment.offset_days),
                    reason: Some(seed_appointment.reason.to_string()),
                    vet_name: Some(seed_appointment.vet_name.to_string()),
                    notes: Some(seed_appointment.notes.to_string()),
                })?;
                summary.appointments += 1;
            }

            for seed_record in seed_pet.records {
                records.create(CreateMedicalRecordRequest {
                    pet_id: pet.id,
                    kind: seed_record.kind,
                    name: seed_record.name.to_string(),
                    date: shifted(today, seed_record.offset_days),
                    notes: Some(seed_record.notes.to_string()),
                })?;
                summary.medical_records += 1;
            }
        }
    }

    tx.commit()?;
    info!(
        "event=seed module=seed status=ok owners={} pets={} appointments={} medical_records={}",
        summary.owners, summary.pets, summary.appointments, summary.medical_records
    );
    Ok(summary)
}

fn shifted(today: NaiveDate, offset_days: i64) -> String {
    format_iso_date(today + Duration::days(offset_days))
}
