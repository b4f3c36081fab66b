use chrono::NaiveDate;
use petcare_core::db::open_db_in_memory;
use petcare_core::{
    AppointmentService, AppointmentUpdate, CreateAppointmentRequest, CreatePetRequest, EntityRef,
    OwnerService, PetService, ServiceError, SqliteAppointmentRepository, SqliteOwnerRepository,
    SqlitePetRepository, ValidationError,
};
use proptest::prelude::*;
use rusqlite::Connection;
use std::collections::HashSet;

fn appointment_service(conn: &Connection) -> AppointmentService<SqliteAppointmentRepository<'_>> {
    AppointmentService::new(SqliteAppointmentRepository::try_new(conn).unwrap())
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// Creates an owner with one pet and returns `(owner_id, pet_id)`.
fn owner_with_pet(conn: &Connection, contact: &str, pet_name: &str) -> (i64, i64) {
    let owner = OwnerService::new(SqliteOwnerRepository::try_new(conn).unwrap())
        .create("Alice Johnson", contact)
        .unwrap();
    let pet = add_pet(conn, pet_name, Some(owner.id));
    (owner.id, pet)
}

fn add_pet(conn: &Connection, name: &str, owner_id: Option<i64>) -> i64 {
    PetService::new(SqlitePetRepository::try_new(conn).unwrap())
        .create(CreatePetRequest {
            name: name.to_string(),
            species: "Dog".to_string(),
            breed: Some("Beagle".to_string()),
            age: Some(4),
            owner_id,
        })
        .unwrap()
        .id
}

fn schedule(service: &AppointmentService<SqliteAppointmentRepository<'_>>, pet_id: i64, on: &str) -> i64 {
    service
        .create(CreateAppointmentRequest {
            pet_id,
            date: on.to_string(),
            reason: Some("Checkup".to_string()),
            ..CreateAppointmentRequest::default()
        })
        .unwrap()
        .id
}

#[test]
fn scheduled_vaccination_shows_as_upcoming() {
    let conn = open_db_in_memory().unwrap();
    let (_, pet_id) = owner_with_pet(&conn, "0710000001", "Buddy");
    let service = appointment_service(&conn);

    let created = service
        .create(CreateAppointmentRequest {
            pet_id,
            date: "2025-11-10".to_string(),
            reason: Some("Vaccination".to_string()),
            vet_name: Some("Dr. Kilonzo".to_string()),
            notes: Some(String::new()),
        })
        .unwrap();
    assert_eq!(created.notes, None);

    let upcoming = service.upcoming_for_pet(pet_id, date("2025-01-01")).unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].date, date("2025-11-10"));
    assert_eq!(upcoming[0].vet_name.as_deref(), Some("Dr. Kilonzo"));
}

#[test]
fn create_validates_pet_and_date() {
    let conn = open_db_in_memory().unwrap();
    let (_, pet_id) = owner_with_pet(&conn, "0710000001", "Buddy");
    let service = appointment_service(&conn);

    let err = service
        .create(CreateAppointmentRequest {
            pet_id: 0,
            date: "2025-11-10".to_string(),
            ..CreateAppointmentRequest::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::UnsetId("pet_id"))
    ));

    for bad in ["", "2025-1-5", "2025-02-30", "next tuesday"] {
        let err = service
            .create(CreateAppointmentRequest {
                pet_id,
                date: bad.to_string(),
                ..CreateAppointmentRequest::default()
            })
            .unwrap_err();
        assert!(
            matches!(err, ServiceError::Validation(_)),
            "date `{bad}` should be rejected, got {err}"
        );
    }

    let err = service
        .create(CreateAppointmentRequest {
            pet_id: 77,
            date: "2025-11-10".to_string(),
            ..CreateAppointmentRequest::default()
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Pet(77))));
    assert!(service.list_for_pet(pet_id).unwrap().is_empty());
}

#[test]
fn per_pet_queries_are_ordered() {
    let conn = open_db_in_memory().unwrap();
    let (_, pet_id) = owner_with_pet(&conn, "0710000001", "Buddy");
    let service = appointment_service(&conn);
    let jan = schedule(&service, pet_id, "2025-01-20");
    let dec = schedule(&service, pet_id, "2024-12-01");
    let mar = schedule(&service, pet_id, "2025-03-05");
    let feb = schedule(&service, pet_id, "2025-02-14");
    let as_of = date("2025-02-14");

    let ids = |items: Vec<petcare_core::Appointment>| -> Vec<i64> {
        items.into_iter().map(|item| item.id).collect()
    };
    assert_eq!(ids(service.list_for_pet(pet_id).unwrap()), vec![mar, feb, jan, dec]);
    assert_eq!(
        ids(service.upcoming_for_pet(pet_id, as_of).unwrap()),
        vec![feb, mar]
    );
    assert_eq!(
        ids(service.past_for_pet(pet_id, as_of).unwrap()),
        vec![jan, dec]
    );

    let next = service.next_for_pet(pet_id, as_of).unwrap().unwrap();
    assert_eq!(next.id, feb);
    assert_eq!(next.date, as_of);
    assert!(service
        .next_for_pet(pet_id, date("2025-03-06"))
        .unwrap()
        .is_none());
}

#[test]
fn owner_report_joins_pets_and_ignores_reference_date() {
    let conn = open_db_in_memory().unwrap();
    let (alice, buddy) = owner_with_pet(&conn, "0710000001", "Buddy");
    let mittens = add_pet(&conn, "Mittens", Some(alice));
    let (_, rocky) = owner_with_pet(&conn, "0710000002", "Rocky");
    let stray = add_pet(&conn, "Stray", None);
    let service = appointment_service(&conn);

    let old = schedule(&service, buddy, "2020-05-01");
    let soon = schedule(&service, mittens, "2025-06-01");
    let later = schedule(&service, buddy, "2025-07-01");
    schedule(&service, rocky, "2025-06-15");
    schedule(&service, stray, "2025-06-16");

    let report = service.upcoming_for_owner(alice).unwrap();
    let ids: Vec<_> = report.iter().map(|row| row.appointment_id).collect();
    assert_eq!(ids, vec![old, soon, later]);
    assert_eq!(report[1].pet_name, "Mittens");
    assert!(report.windows(2).all(|pair| pair[0].date <= pair[1].date));

    assert!(service.upcoming_for_owner(999).unwrap().is_empty());
}

#[test]
fn update_changes_only_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let (_, pet_id) = owner_with_pet(&conn, "0710000001", "Buddy");
    let service = appointment_service(&conn);
    let created = service
        .create(CreateAppointmentRequest {
            pet_id,
            date: "2025-11-10".to_string(),
            reason: Some("Vaccination".to_string()),
            vet_name: Some("Dr. Kilonzo".to_string()),
            notes: Some("Rabies booster".to_string()),
        })
        .unwrap();

    let updated = service
        .update(
            created.id,
            AppointmentUpdate {
                date: Some("2025-11-12".to_string()),
                notes: Some(None),
                ..AppointmentUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.date, date("2025-11-12"));
    assert_eq!(updated.notes, None);
    assert_eq!(updated.reason.as_deref(), Some("Vaccination"));
    assert_eq!(updated.vet_name.as_deref(), Some("Dr. Kilonzo"));

    let err = service
        .update(
            created.id,
            AppointmentUpdate {
                date: Some("12/11/2025".to_string()),
                ..AppointmentUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidDate { .. })
    ));
}

#[test]
fn update_and_delete_missing_appointment_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = appointment_service(&conn);

    let err = service.update(5, AppointmentUpdate::default()).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Appointment(5))));
    let err = service.delete(0).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Appointment(0))));
}

#[test]
fn delete_removes_appointment() {
    let conn = open_db_in_memory().unwrap();
    let (_, pet_id) = owner_with_pet(&conn, "0710000001", "Buddy");
    let service = appointment_service(&conn);
    let id = schedule(&service, pet_id, "2025-11-10");

    service.delete(id).unwrap();
    assert!(service.get_by_id(id).unwrap().is_none());
    assert!(service.list_for_pet(pet_id).unwrap().is_empty());
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn upcoming_and_past_partition_history(
        dates in prop::collection::vec(arb_date(), 0..12),
        today in arb_date(),
    ) {
        let conn = open_db_in_memory().unwrap();
        let (_, pet_id) = owner_with_pet(&conn, "0710000001", "Buddy");
        let service = appointment_service(&conn);
        for on in &dates {
            schedule(&service, pet_id, &on.format("%Y-%m-%d").to_string());
        }

        let all: HashSet<i64> = service
            .list_for_pet(pet_id)
            .unwrap()
            .into_iter()
            .map(|item| item.id)
            .collect();
        let upcoming = service.upcoming_for_pet(pet_id, today).unwrap();
        let past = service.past_for_pet(pet_id, today).unwrap();

        prop_assert!(upcoming.iter().all(|item| item.date >= today));
        prop_assert!(past.iter().all(|item| item.date < today));
        prop_assert!(upcoming.windows(2).all(|pair| pair[0].date <= pair[1].date));
        prop_assert!(past.windows(2).all(|pair| pair[0].date >= pair[1].date));
        prop_assert_eq!(upcoming.len() + past.len(), all.len());

        let union: HashSet<i64> = upcoming
            .iter()
            .chain(past.iter())
            .map(|item| item.id)
            .collect();
        prop_assert_eq!(union, all);

        let next = service.next_for_pet(pet_id, today).unwrap();
        match upcoming.first() {
            Some(first) => {
                let next = next.unwrap();
                prop_assert_eq!(next.id, first.id);
                prop_assert!(upcoming.iter().all(|item| next.date <= item.date));
            }
            None => prop_assert!(next.is_none()),
        }
    }
}
