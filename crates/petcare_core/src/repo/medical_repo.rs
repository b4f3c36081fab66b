//! Medical history repository contract and SQLite implementation.
//!
//! # Invariants
//! - Records are append/delete only.
//! - History listings are ordered `date DESC, id DESC`.

use crate::model::medical_record::{MedicalRecord, MedicalRecordId, NewMedicalRecord, RecordKind};
use crate::model::owner::OwnerId;
use crate::model::pet::PetId;
use crate::model::validation::format_iso_date;
use crate::repo::error::{EntityRef, RepoError, RepoResult};
use crate::repo::{decode_date, ensure_connection_ready, RequiredTable};
use rusqlite::{params, Connection, Row, ToSql};

const REQUIRED_TABLES: &[RequiredTable] = &[
    RequiredTable {
        name: "medical_history",
        columns: &["id", "pet_id", "record_type", "name", "date", "notes"],
    },
    RequiredTable {
        name: "pets",
        columns: &["id", "owner_id"],
    },
];

/// Repository interface for medical history entries.
pub trait MedicalRecordRepository {
    fn create_record(&self, record: &NewMedicalRecord) -> RepoResult<MedicalRecordId>;
    fn delete_record(&self, id: MedicalRecordId) -> RepoResult<()>;
    fn get_record(&self, id: MedicalRecordId) -> RepoResult<Option<MedicalRecord>>;
    fn list_for_pet(&self, pet_id: PetId) -> RepoResult<Vec<MedicalRecord>>;
    fn list_for_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<MedicalRecord>>;
}

/// SQLite-backed medical history repository.
pub struct SqliteMedicalRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMedicalRecordRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }

    fn query_records(&self, sql: &str, params: &[&dyn ToSql]) -> RepoResult<Vec<MedicalRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }
}

impl MedicalRecordRepository for SqliteMedicalRecordRepository<'_> {
    fn create_record(&self, record: &NewMedicalRecord) -> RepoResult<MedicalRecordId> {
        self.conn.execute(
            "INSERT INTO medical_history (pet_id, record_type, name, date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.pet_id,
                record.kind.as_str(),
                record.name.as_str(),
                format_iso_date(record.date),
                record.notes.as_deref(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn delete_record(&self, id: MedicalRecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM medical_history WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::MedicalRecord(id)));
        }
        Ok(())
    }

    fn get_record(&self, id: MedicalRecordId) -> RepoResult<Option<MedicalRecord>> {
        let mut found = self.query_records(
            "SELECT id, pet_id, record_type, name, date, notes
             FROM medical_history
             WHERE id = ?1;",
            &[&id],
        )?;
        Ok(found.pop())
    }

    fn list_for_pet(&self, pet_id: PetId) -> RepoResult<Vec<MedicalRecord>> {
        self.query_records(
            "SELECT id, pet_id, record_type, name, date, notes
             FROM medical_history
             WHERE pet_id = ?1
             ORDER BY date DESC, id DESC;",
            &[&pet_id],
        )
    }

    fn list_for_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<MedicalRecord>> {
        self.query_records(
            "SELECT m.id AS id, m.pet_id AS pet_id, m.record_type AS record_type,
                    m.name AS name, m.date AS date, m.notes AS notes
             FROM medical_history m
             INNER JOIN pets p ON p.id = m.pet_id
             WHERE p.owner_id = ?1
             ORDER BY m.date DESC, m.id DESC;",
            &[&owner_id],
        )
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<MedicalRecord> {
    let kind_text: String = row.get("record_type")?;
    let kind = kind_text.parse::<RecordKind>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid record type `{kind_text}` in medical_history.record_type"
        ))
    })?;
    let date_text: String = row.get("date")?;

    Ok(MedicalRecord {
        id: row.get("id")?,
        pet_id: row.get("pet_id")?,
        kind,
        name: row.get("name")?,
        date: decode_date("medical_history", "date", &date_text)?,
        notes: row.get("notes")?,
    })
}
