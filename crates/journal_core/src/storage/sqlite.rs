//! Relational backend over SQLite.
//!
//! # Responsibility
//! - Map the storage contract onto parameterized statements against the
//!   `journal_entries` table.
//! - Translate SQLite constraint failures into semantic storage errors.
//!
//! # Invariants
//! - The wrapped connection has migrations applied (see `crate::db`).
//! - Timestamps are stored as Unix epoch milliseconds.
//! - `UPDATE` and upsert paths never write the `created` column.

use crate::db::{open_db, open_db_in_memory};
use crate::model::entry::Entry;
use crate::storage::{Storage, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{ffi, params, Connection, Row};
use std::path::Path;

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    created,
    updated
FROM journal_entries";

/// SQLite-backed entry storage.
///
/// A rusqlite connection is not `Sync`, so access is serialized through a
/// mutex; SQLite itself provides the durability and isolation guarantees.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (or creates) a database file and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a private in-memory database, mainly for tests.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }
}

impl Storage for SqliteStorage {
    fn create_entry(&self, entry: &Entry) -> StorageResult<()> {
        entry.validate()?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO journal_entries (id, title, content, created, updated)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                entry.id.as_str(),
                entry.title.as_str(),
                entry.content.as_str(),
                entry.created.timestamp_millis(),
                entry.updated.timestamp_millis(),
            ],
        )
        .map_err(|err| map_insert_error(err, &entry.id))?;

        Ok(())
    }

    fn get_entry(&self, id: &str) -> StorageResult<Entry> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_entry_row(row);
        }

        Err(StorageError::NotFound(id.to_string()))
    }

    fn list_entries(&self) -> StorageResult<Vec<Entry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{ENTRY_SELECT_SQL} ORDER BY created ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn update_entry(&self, entry: &Entry) -> StorageResult<()> {
        entry.validate()?;

        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE journal_entries
             SET
                title = ?1,
                content = ?2,
                updated = ?3
             WHERE id = ?4;",
            params![
                entry.title.as_str(),
                entry.content.as_str(),
                entry.updated.timestamp_millis(),
                entry.id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::NotFound(entry.id.clone()));
        }

        Ok(())
    }

    fn delete_entry(&self, id: &str) -> StorageResult<()> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM journal_entries WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn save_entries(&self, entries: &[Entry]) -> StorageResult<()> {
        for entry in entries {
            entry.validate()?;
        }

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO journal_entries (id, title, content, created, updated)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    content = excluded.content,
                    updated = MAX(excluded.updated, journal_entries.created);",
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.id.as_str(),
                    entry.title.as_str(),
                    entry.content.as_str(),
                    entry.created.timestamp_millis(),
                    entry.updated.timestamp_millis(),
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }
}

fn parse_entry_row(row: &Row<'_>) -> StorageResult<Entry> {
    let id: String = row.get("id")?;
    let created = millis_to_datetime(row.get("created")?, &id, "created")?;
    let updated = millis_to_datetime(row.get("updated")?, &id, "updated")?;

    let entry = Entry {
        title: row.get("title")?,
        content: row.get("content")?,
        id,
        created,
        updated,
    };
    entry.validate()?;
    Ok(entry)
}

fn millis_to_datetime(value: i64, id: &str, column: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        StorageError::InvalidData(format!(
            "timestamp `{value}` out of range in journal_entries.{column} (id `{id}`)"
        ))
    })
}

fn map_insert_error(err: rusqlite::Error, id: &str) -> StorageError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            StorageError::DuplicateKey(id.to_string())
        }
        _ => err.into(),
    }
}
