//! Appointment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist appointments and answer per-pet and per-owner date queries.
//!
//! # Invariants
//! - Dates are stored as canonical `YYYY-MM-DD` text, so SQL text ordering
//!   equals calendar ordering.
//! - Upcoming: `date >= as_of`, ordered `date ASC, id ASC`.
//! - Past and full history: ordered `date DESC, id DESC`.
//! - The owner report is a join over the owner's pets and ignores `as_of`.

use crate::model::appointment::{
    Appointment, AppointmentId, AppointmentPatch, NewAppointment, NextAppointment,
    OwnerAppointment,
};
use crate::model::owner::OwnerId;
use crate::model::pet::PetId;
use crate::model::validation::format_iso_date;
use crate::repo::error::{EntityRef, RepoError, RepoResult};
use crate::repo::{
    decode_date, ensure_connection_ready, integer_value, text_value, PartialUpdate,
    RequiredTable,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, ToSql};

const APPOINTMENT_SELECT_SQL: &str =
    "SELECT id, pet_id, date, reason, vet_name, notes FROM appointments";

const REQUIRED_TABLES: &[RequiredTable] = &[
    RequiredTable {
        name: "appointments",
        columns: &["id", "pet_id", "date", "reason", "vet_name", "notes"],
    },
    RequiredTable {
        name: "pets",
        columns: &["id", "name", "owner_id"],
    },
];

/// Repository interface for appointment persistence and scheduling queries.
pub trait AppointmentRepository {
    fn create_appointment(&self, appointment: &NewAppointment) -> RepoResult<AppointmentId>;
    fn update_appointment(&self, id: AppointmentId, patch: &AppointmentPatch) -> RepoResult<()>;
    fn delete_appointment(&self, id: AppointmentId) -> RepoResult<()>;
    fn get_appointment(&self, id: AppointmentId) -> RepoResult<Option<Appointment>>;
    fn list_for_pet(&self, pet_id: PetId) -> RepoResult<Vec<Appointment>>;
    fn upcoming_for_pet(&self, pet_id: PetId, as_of: NaiveDate) -> RepoResult<Vec<Appointment>>;
    fn past_for_pet(&self, pet_id: PetId, as_of: NaiveDate) -> RepoResult<Vec<Appointment>>;
    fn next_for_pet(&self, pet_id: PetId, as_of: NaiveDate)
        -> RepoResult<Option<NextAppointment>>;
    fn upcoming_for_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<OwnerAppointment>>;
}

/// SQLite-backed appointment repository.
pub struct SqliteAppointmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAppointmentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }

    fn query_appointments(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> RepoResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut appointments = Vec::new();
        while let Some(row) = rows.next()? {
            appointments.push(parse_appointment_row(row)?);
        }
        Ok(appointments)
    }
}

impl AppointmentRepository for SqliteAppointmentRepository<'_> {
    fn create_appointment(&self, appointment: &NewAppointment) -> RepoResult<AppointmentId> {
        self.conn.execute(
            "INSERT INTO appointments (pet_id, date, reason, vet_name, notes)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                appointment.pet_id,
                format_iso_date(appointment.date),
                appointment.reason.as_deref(),
                appointment.vet_name.as_deref(),
                appointment.notes.as_deref(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_appointment(&self, id: AppointmentId, patch: &AppointmentPatch) -> RepoResult<()> {
        let mut update = PartialUpdate::new("appointments");
        if let Some(pet_id) = patch.pet_id {
            update.set("pet_id", integer_value(Some(pet_id)));
        }
        if let Some(date) = patch.date {
            update.set("date", text_value(Some(format_iso_date(date).as_str())));
        }
        if let Some(reason) = patch.reason.as_ref() {
            update.set("reason", text_value(reason.as_deref()));
        }
        if let Some(vet_name) = patch.vet_name.as_ref() {
            update.set("vet_name", text_value(vet_name.as_deref()));
        }
        if let Some(notes) = patch.notes.as_ref() {
            update.set("notes", text_value(notes.as_deref()));
        }

        if !update.execute(self.conn, id)? {
            return Err(RepoError::NotFound(EntityRef::Appointment(id)));
        }
        Ok(())
    }

    fn delete_appointment(&self, id: AppointmentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Appointment(id)));
        }
        Ok(())
    }

    fn get_appointment(&self, id: AppointmentId) -> RepoResult<Option<Appointment>> {
        let mut found = self.query_appointments(
            &format!("{APPOINTMENT_SELECT_SQL} WHERE id = ?1;"),
            &[&id],
        )?;
        Ok(found.pop())
    }

    fn list_for_pet(&self, pet_id: PetId) -> RepoResult<Vec<Appointment>> {
        self.query_appointments(
            &format!("{APPOINTMENT_SELECT_SQL} WHERE pet_id = ?1 ORDER BY date DESC, id DESC;"),
            &[&pet_id],
        )
    }

    fn upcoming_for_pet(&self, pet_id: PetId, as_of: NaiveDate) -> RepoResult<Vec<Appointment>> {
        let as_of = format_iso_date(as_of);
        self.query_appointments(
            &format!(
                "{APPOINTMENT_SELECT_SQL}
                 WHERE pet_id = ?1 AND date >= ?2
                 ORDER BY date ASC, id ASC;"
            ),
            &[&pet_id, &as_of],
        )
    }

    fn past_for_pet(&self, pet_id: PetId, as_of: NaiveDate) -> RepoResult<Vec<Appointment>> {
        let as_of = format_iso_date(as_of);
        self.query_appointments(
            &format!(
                "{APPOINTMENT_SELECT_SQL}
                 WHERE pet_id = ?1 AND date < ?2
                 ORDER BY date DESC, id DESC;"
            ),
            &[&pet_id, &as_of],
        )
    }

    fn next_for_pet(
        &self,
        pet_id: PetId,
        as_of: NaiveDate,
    ) -> RepoResult<Option<NextAppointment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date
             FROM appointments
             WHERE pet_id = ?1 AND date >= ?2
             ORDER BY date ASC, id ASC
             LIMIT 1;",
        )?;
        let mut rows = stmt.query(params![pet_id, format_iso_date(as_of)])?;
        if let Some(row) = rows.next()? {
            let date_text: String = row.get("date")?;
            return Ok(Some(NextAppointment {
                id: row.get("id")?,
                date: decode_date("appointments", "date", &date_text)?,
            }));
        }
        Ok(None)
    }

    fn upcoming_for_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<OwnerAppointment>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id AS appointment_id, p.name AS pet_name, a.date AS date
             FROM appointments a
             INNER JOIN pets p ON p.id = a.pet_id
             WHERE p.owner_id = ?1
             ORDER BY a.date ASC, a.id ASC;",
        )?;
        let mut rows = stmt.query([owner_id])?;
        let mut report = Vec::new();
        while let Some(row) = rows.next()? {
            let date_text: String = row.get("date")?;
            report.push(OwnerAppointment {
                appointment_id: row.get("appointment_id")?,
                pet_name: row.get("pet_name")?,
                date: decode_date("appointments", "date", &date_text)?,
            });
        }
        Ok(report)
    }
}

fn parse_appointment_row(row: &Row<'_>) -> RepoResult<Appointment> {
    let date_text: String = row.get("date")?;
    Ok(Appointment {
        id: row.get("id")?,
        pet_id: row.get("pet_id")?,
        date: decode_date("appointments", "date", &date_text)?,
        reason: row.get("reason")?,
        vet_name: row.get("vet_name")?,
        notes: row.get("notes")?,
    })
}
