use petcare_core::db::open_db_in_memory;
use petcare_core::{
    AppointmentService, CreateAppointmentRequest, CreateMedicalRecordRequest, CreatePetRequest,
    EntityRef, MedicalRecordService, OwnerService, PetDependents, PetPatch, PetService,
    RecordKind, ServiceError, SqliteAppointmentRepository, SqliteMedicalRecordRepository,
    SqliteOwnerRepository, SqlitePetRepository, ValidationError,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn pet_service(conn: &Connection) -> PetService<SqlitePetRepository<'_>> {
    PetService::new(SqlitePetRepository::try_new(conn).unwrap())
}

fn create_owner(conn: &Connection, name: &str, contact: &str) -> i64 {
    OwnerService::new(SqliteOwnerRepository::try_new(conn).unwrap())
        .create(name, contact)
        .unwrap()
        .id
}

fn pet_request(name: &str, owner_id: Option<i64>) -> CreatePetRequest {
    CreatePetRequest {
        name: name.to_string(),
        species: "Dog".to_string(),
        breed: Some("Beagle".to_string()),
        age: Some(3),
        owner_id,
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let owner_id = create_owner(&conn, "Alice Johnson", "0710000001");
    let service = pet_service(&conn);

    let pet = service
        .create(CreatePetRequest {
            name: "Buddy".to_string(),
            species: "Dog".to_string(),
            breed: Some("Beagle".to_string()),
            age: Some(4),
            owner_id: Some(owner_id),
        })
        .unwrap();

    let loaded = service.get_by_id(pet.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Buddy");
    assert_eq!(loaded.species, "Dog");
    assert_eq!(loaded.breed.as_deref(), Some("Beagle"));
    assert_eq!(loaded.age, Some(4));
    assert_eq!(loaded.owner_id, Some(owner_id));
}

#[test]
fn pets_may_have_no_owner() {
    let conn = open_db_in_memory().unwrap();
    let service = pet_service(&conn);

    let stray = service
        .create(CreatePetRequest {
            name: "Stray".to_string(),
            species: "Cat".to_string(),
            ..CreatePetRequest::default()
        })
        .unwrap();
    assert_eq!(stray.owner_id, None);
    assert_eq!(stray.breed, None);
    assert_eq!(stray.age, None);
}

#[test]
fn create_requires_name_and_species() {
    let conn = open_db_in_memory().unwrap();
    let service = pet_service(&conn);

    let err = service
        .create(CreatePetRequest {
            name: "Buddy".to_string(),
            species: " ".to_string(),
            ..CreatePetRequest::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::EmptyField("species"))
    ));
    assert!(service.list_all().unwrap().is_empty());
}

#[test]
fn create_with_unknown_owner_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = pet_service(&conn);

    let err = service.create(pet_request("Buddy", Some(99))).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Owner(99))));
}

#[test]
fn find_by_owner_is_set_equal_to_created_pets() {
    let conn = open_db_in_memory().unwrap();
    let alice = create_owner(&conn, "Alice", "0710000001");
    let brian = create_owner(&conn, "Brian", "0710000002");
    let service = pet_service(&conn);

    let mut expected = HashSet::new();
    for (name, owner) in [
        ("Buddy", alice),
        ("Rocky", brian),
        ("Mittens", alice),
        ("Kiwi", brian),
        ("Luna", alice),
    ] {
        let pet = service.create(pet_request(name, Some(owner))).unwrap();
        if owner == alice {
            expected.insert(pet.id);
        }
    }

    let found: HashSet<_> = service
        .find_by_owner(alice)
        .unwrap()
        .into_iter()
        .map(|pet| pet.id)
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn find_by_name_substring_scenarios() {
    let conn = open_db_in_memory().unwrap();
    let service = pet_service(&conn);
    let buddy = service.create(pet_request("Buddy", None)).unwrap();
    let junior = service.create(pet_request("Buddy Jr", None)).unwrap();

    let found = service.find_by_name_substring("Buddy").unwrap();
    assert_eq!(found, vec![buddy, junior]);

    let other = open_db_in_memory().unwrap();
    let other_service = pet_service(&other);
    other_service.create(pet_request("Max", None)).unwrap();
    assert!(other_service
        .find_by_name_substring("Buddy")
        .unwrap()
        .is_empty());
}

#[test]
fn update_applies_partial_patch_and_explicit_clears() {
    let conn = open_db_in_memory().unwrap();
    let owner_id = create_owner(&conn, "Alice", "0710000001");
    let service = pet_service(&conn);
    let pet = service.create(pet_request("Buddy", Some(owner_id))).unwrap();

    let updated = service
        .update(
            pet.id,
            PetPatch {
                age: Some(Some(5)),
                breed: Some(None),
                ..PetPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.age, Some(5));
    assert_eq!(updated.breed, None);
    assert_eq!(updated.name, "Buddy");
    assert_eq!(updated.owner_id, Some(owner_id));

    let orphaned = service
        .update(
            pet.id,
            PetPatch {
                owner_id: Some(None),
                ..PetPatch::default()
            },
        )
        .unwrap();
    assert_eq!(orphaned.owner_id, None);
}

#[test]
fn update_rejects_unknown_owner_and_missing_pet() {
    let conn = open_db_in_memory().unwrap();
    let service = pet_service(&conn);
    let pet = service.create(pet_request("Buddy", None)).unwrap();

    let err = service
        .update(
            pet.id,
            PetPatch {
                owner_id: Some(Some(7)),
                ..PetPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Owner(7))));

    let err = service.update(404, PetPatch::default()).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Pet(404))));
}

#[test]
fn delete_is_refused_while_history_exists() {
    let conn = open_db_in_memory().unwrap();
    let service = pet_service(&conn);
    let pet = service.create(pet_request("Buddy", None)).unwrap();

    let appointments =
        AppointmentService::new(SqliteAppointmentRepository::try_new(&conn).unwrap());
    let appointment = appointments
        .create(CreateAppointmentRequest {
            pet_id: pet.id,
            date: "2025-11-10".to_string(),
            ..CreateAppointmentRequest::default()
        })
        .unwrap();
    let records = MedicalRecordService::new(SqliteMedicalRecordRepository::try_new(&conn).unwrap());
    let record = records
        .create(CreateMedicalRecordRequest {
            pet_id: pet.id,
            kind: RecordKind::Vaccination,
            name: "Rabies".to_string(),
            date: "2025-01-15".to_string(),
            notes: None,
        })
        .unwrap();

    let err = service.delete(pet.id).unwrap_err();
    match err {
        ServiceError::PetInUse { pet_id, dependents } => {
            assert_eq!(pet_id, pet.id);
            assert_eq!(
                dependents,
                PetDependents {
                    appointments: 1,
                    medical_records: 1
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.get_by_id(pet.id).unwrap().is_some());

    appointments.delete(appointment.id).unwrap();
    records.delete(record.id).unwrap();
    assert!(service.dependents(pet.id).unwrap().is_empty());
    service.delete(pet.id).unwrap();
    assert!(service.get_by_id(pet.id).unwrap().is_none());
}

#[test]
fn delete_unknown_pet_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = pet_service(&conn);

    let err = service.delete(3).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Pet(3))));
    let err = service.dependents(3).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Pet(3))));
}
