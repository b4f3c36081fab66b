//! Pet repository contract and SQLite implementation.
//!
//! # Invariants
//! - `owner_id`, when set, must reference an existing owner.
//! - Deleting a pet referenced by appointments or medical history fails with
//!   a foreign-key constraint; check and delete are one statement.
//! - Listing order is `id ASC`.

use crate::model::owner::OwnerId;
use crate::model::pet::{NewPet, Pet, PetId, PetPatch};
use crate::repo::error::{EntityRef, RepoError, RepoResult};
use crate::repo::{
    ensure_connection_ready, integer_value, like_contains_pattern, text_value, PartialUpdate,
    RequiredTable,
};
use rusqlite::{params, Connection, Row, ToSql};

const PET_SELECT_SQL: &str = "SELECT id, name, species, breed, age, owner_id FROM pets";

const REQUIRED_TABLES: &[RequiredTable] = &[
    RequiredTable {
        name: "pets",
        columns: &["id", "name", "species", "breed", "age", "owner_id"],
    },
    RequiredTable {
        name: "appointments",
        columns: &["pet_id"],
    },
    RequiredTable {
        name: "medical_history",
        columns: &["pet_id"],
    },
];

/// Rows that reference one pet and therefore block its deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PetDependents {
    pub appointments: u32,
    pub medical_records: u32,
}

impl PetDependents {
    pub fn is_empty(&self) -> bool {
        self.appointments == 0 && self.medical_records == 0
    }
}

/// Repository interface for pet CRUD and lookup.
pub trait PetRepository {
    fn create_pet(&self, pet: &NewPet) -> RepoResult<PetId>;
    fn update_pet(&self, id: PetId, patch: &PetPatch) -> RepoResult<()>;
    fn delete_pet(&self, id: PetId) -> RepoResult<()>;
    fn get_pet(&self, id: PetId) -> RepoResult<Option<Pet>>;
    fn list_pets(&self) -> RepoResult<Vec<Pet>>;
    fn find_pets_by_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<Pet>>;
    fn find_pets_by_name(&self, query: &str) -> RepoResult<Vec<Pet>>;
    fn count_dependents(&self, id: PetId) -> RepoResult<PetDependents>;
}

/// SQLite-backed pet repository.
pub struct SqlitePetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }

    fn query_pets(&self, sql: &str, params: &[&dyn ToSql]) -> RepoResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut pets = Vec::new();
        while let Some(row) = rows.next()? {
            pets.push(parse_pet_row(row)?);
        }
        Ok(pets)
    }
}

impl PetRepository for SqlitePetRepository<'_> {
    fn create_pet(&self, pet: &NewPet) -> RepoResult<PetId> {
        self.conn.execute(
            "INSERT INTO pets (name, species, breed, age, owner_id)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                pet.name.as_str(),
                pet.species.as_str(),
                pet.breed.as_deref(),
                pet.age,
                pet.owner_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_pet(&self, id: PetId, patch: &PetPatch) -> RepoResult<()> {
        let mut update = PartialUpdate::new("pets");
        if let Some(name) = patch.name.as_deref() {
            update.set("name", text_value(Some(name)));
        }
        if let Some(species) = patch.species.as_deref() {
            update.set("species", text_value(Some(species)));
        }
        if let Some(breed) = patch.breed.as_ref() {
            update.set("breed", text_value(breed.as_deref()));
        }
        if let Some(age) = patch.age {
            update.set("age", integer_value(age.map(i64::from)));
        }
        if let Some(owner_id) = patch.owner_id {
            update.set("owner_id", integer_value(owner_id));
        }

        if !update.execute(self.conn, id)? {
            return Err(RepoError::NotFound(EntityRef::Pet(id)));
        }
        Ok(())
    }

    fn delete_pet(&self, id: PetId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM pets WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Pet(id)));
        }
        Ok(())
    }

    fn get_pet(&self, id: PetId) -> RepoResult<Option<Pet>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PET_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pet_row(row)?));
        }
        Ok(None)
    }

    fn list_pets(&self) -> RepoResult<Vec<Pet>> {
        self.query_pets(&format!("{PET_SELECT_SQL} ORDER BY id ASC;"), &[])
    }

    fn find_pets_by_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<Pet>> {
        self.query_pets(
            &format!("{PET_SELECT_SQL} WHERE owner_id = ?1 ORDER BY id ASC;"),
            &[&owner_id],
        )
    }

    fn find_pets_by_name(&self, query: &str) -> RepoResult<Vec<Pet>> {
        let pattern = like_contains_pattern(query);
        self.query_pets(
            &format!("{PET_SELECT_SQL} WHERE name LIKE ?1 ESCAPE '\\' ORDER BY id ASC;"),
            &[&pattern],
        )
    }

    fn count_dependents(&self, id: PetId) -> RepoResult<PetDependents> {
        let dependents = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM appointments WHERE pet_id = ?1),
                (SELECT COUNT(*) FROM medical_history WHERE pet_id = ?1);",
            [id],
            |row| {
                Ok(PetDependents {
                    appointments: row.get(0)?,
                    medical_records: row.get(1)?,
                })
            },
        )?;
        Ok(dependents)
    }
}

fn parse_pet_row(row: &Row<'_>) -> RepoResult<Pet> {
    let age = match row.get::<_, Option<i64>>("age")? {
        Some(value) => Some(u32::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!("invalid age `{value}` in pets.age"))
        })?),
        None => None,
    };

    Ok(Pet {
        id: row.get("id")?,
        name: row.get("name")?,
        species: row.get("species")?,
        breed: row.get("breed")?,
        age,
        owner_id: row.get("owner_id")?,
    })
}
