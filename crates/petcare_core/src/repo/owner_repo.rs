//! Owner repository contract and SQLite implementation.
//!
//! # Invariants
//! - `contact` uniqueness is enforced by the store `UNIQUE` constraint.
//! - Deleting an owner still referenced by a pet fails with a foreign-key
//!   constraint (`ON DELETE RESTRICT`).
//! - Listing order is `id ASC`.

use crate::model::owner::{NewOwner, Owner, OwnerId, OwnerPatch};
use crate::repo::error::{EntityRef, RepoError, RepoResult};
use crate::repo::{
    ensure_connection_ready, like_contains_pattern, text_value, PartialUpdate, RequiredTable,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const OWNER_SELECT_SQL: &str = "SELECT id, name, contact FROM owners";

const REQUIRED_TABLES: &[RequiredTable] = &[
    RequiredTable {
        name: "owners",
        columns: &["id", "name", "contact"],
    },
    RequiredTable {
        name: "pets",
        columns: &["owner_id"],
    },
];

/// Repository interface for owner CRUD and lookup.
pub trait OwnerRepository {
    fn create_owner(&self, owner: &NewOwner) -> RepoResult<OwnerId>;
    fn update_owner(&self, id: OwnerId, patch: &OwnerPatch) -> RepoResult<()>;
    fn delete_owner(&self, id: OwnerId) -> RepoResult<()>;
    fn get_owner(&self, id: OwnerId) -> RepoResult<Option<Owner>>;
    fn list_owners(&self) -> RepoResult<Vec<Owner>>;
    /// Substring match on `name`; ASCII case-insensitive like SQL `LIKE`.
    fn find_owners_by_name(&self, query: &str) -> RepoResult<Vec<Owner>>;
    fn find_owner_by_contact(&self, contact: &str) -> RepoResult<Option<Owner>>;
    /// Number of pets referencing the owner.
    fn count_pets(&self, id: OwnerId) -> RepoResult<u32>;
}

/// SQLite-backed owner repository.
pub struct SqliteOwnerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOwnerRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl OwnerRepository for SqliteOwnerRepository<'_> {
    fn create_owner(&self, owner: &NewOwner) -> RepoResult<OwnerId> {
        self.conn.execute(
            "INSERT INTO owners (name, contact) VALUES (?1, ?2);",
            params![owner.name.as_str(), owner.contact.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_owner(&self, id: OwnerId, patch: &OwnerPatch) -> RepoResult<()> {
        let mut update = PartialUpdate::new("owners");
        if let Some(name) = patch.name.as_deref() {
            update.set("name", text_value(Some(name)));
        }
        if let Some(contact) = patch.contact.as_deref() {
            update.set("contact", text_value(Some(contact)));
        }

        if !update.execute(self.conn, id)? {
            return Err(RepoError::NotFound(EntityRef::Owner(id)));
        }
        Ok(())
    }

    fn delete_owner(&self, id: OwnerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM owners WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Owner(id)));
        }
        Ok(())
    }

    fn get_owner(&self, id: OwnerId) -> RepoResult<Option<Owner>> {
        let owner = self
            .conn
            .query_row(
                &format!("{OWNER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_owner_row,
            )
            .optional()?;
        Ok(owner)
    }

    fn list_owners(&self) -> RepoResult<Vec<Owner>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{OWNER_SELECT_SQL} ORDER BY id ASC;"))?;
        let owners = stmt
            .query_map([], parse_owner_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(owners)
    }

    fn find_owners_by_name(&self, query: &str) -> RepoResult<Vec<Owner>> {
        let mut stmt = self.conn.prepare(&format!(
            "{OWNER_SELECT_SQL} WHERE name LIKE ?1 ESCAPE '\\' ORDER BY id ASC;"
        ))?;
        let owners = stmt
            .query_map([like_contains_pattern(query)], parse_owner_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(owners)
    }

    fn find_owner_by_contact(&self, contact: &str) -> RepoResult<Option<Owner>> {
        let owner = self
            .conn
            .query_row(
                &format!("{OWNER_SELECT_SQL} WHERE contact = ?1;"),
                [contact],
                parse_owner_row,
            )
            .optional()?;
        Ok(owner)
    }

    fn count_pets(&self, id: OwnerId) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM pets WHERE owner_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn parse_owner_row(row: &Row<'_>) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: row.get("id")?,
        name: row.get("name")?,
        contact: row.get("contact")?,
    })
}
