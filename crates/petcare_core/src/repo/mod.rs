//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Repositories only accept connections at the latest schema version.
//! - Repository APIs return semantic errors (`NotFound`, `Constraint`) in
//!   addition to DB transport errors.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod appointment_repo;
pub mod error;
pub mod medical_repo;
pub mod owner_repo;
pub mod pet_repo;

use crate::db::migrations::{current_user_version, latest_version};
use crate::model::validation::parse_iso_date;
use chrono::NaiveDate;
use error::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Table/column set a repository needs before it can run.
pub(crate) struct RequiredTable {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Verifies a connection is migrated and exposes the required schema.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[RequiredTable],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in tables {
        if !table_exists(conn, table.name)? {
            return Err(RepoError::MissingRequiredTable(table.name));
        }
        for &column in table.columns {
            if !table_has_column(conn, table.name, column)? {
                return Err(RepoError::MissingRequiredColumn {
                    table: table.name,
                    column,
                });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn row_exists(conn: &Connection, table: &str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Builds `LIKE` pattern for substring containment.
///
/// `%`, `_` and `\` in the query are escaped; pair with `ESCAPE '\'`.
pub(crate) fn like_contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Decodes a persisted `YYYY-MM-DD` column.
pub(crate) fn decode_date(table: &str, column: &str, value: &str) -> RepoResult<NaiveDate> {
    parse_iso_date("date", value).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{value}` in {table}.{column}"))
    })
}

pub(crate) fn text_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::Text(text.to_string()))
}

pub(crate) fn integer_value(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

/// Single-statement `UPDATE ... SET` over only the supplied columns.
pub(crate) struct PartialUpdate {
    table: &'static str,
    assignments: Vec<String>,
    values: Vec<Value>,
}

impl PartialUpdate {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn set(&mut self, column: &'static str, value: Value) -> &mut Self {
        self.assignments.push(format!("{column} = ?"));
        self.values.push(value);
        self
    }

    /// Applies the update and returns whether the target row exists.
    ///
    /// With nothing to set, only checks existence.
    pub fn execute(self, conn: &Connection, id: i64) -> RepoResult<bool> {
        if self.assignments.is_empty() {
            return row_exists(conn, self.table, id);
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?;",
            self.table,
            self.assignments.join(", ")
        );
        let mut values = self.values;
        values.push(Value::Integer(id));
        let changed = conn.execute(&sql, params_from_iter(values))?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::like_contains_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_contains_pattern("Buddy"), "%Buddy%");
        assert_eq!(like_contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
