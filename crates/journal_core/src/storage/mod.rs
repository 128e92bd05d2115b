//! Storage contract and persistence backends.
//!
//! # Responsibility
//! - Define the narrow persistence interface shared by every backend.
//! - Keep SQL and document-store details out of the `Journal` service.
//!
//! # Invariants
//! - Write paths call `Entry::validate()` before touching the backend.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every backend reports `NotFound` / `DuplicateKey` with the same meaning,
//!   so callers can swap one for another without changing behavior.

use crate::db::DbError;
use crate::model::entry::{Entry, EntryId, EntryValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document;
pub mod sqlite;

pub use document::DocumentStorage;
pub use sqlite::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend selected at startup, erased behind the trait.
pub type DynStorage = Box<dyn Storage + Send + Sync>;

/// Persistence error shared by all backends.
#[derive(Debug)]
pub enum StorageError {
    NotFound(EntryId),
    DuplicateKey(EntryId),
    Validation(EntryValidationError),
    Db(DbError),
    Document(mongodb::error::Error),
    InvalidData(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::DuplicateKey(id) => write!(f, "entry already exists: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Document(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Document(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateKey(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<EntryValidationError> for StorageError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<mongodb::error::Error> for StorageError {
    fn from(value: mongodb::error::Error) -> Self {
        Self::Document(value)
    }
}

/// Persistence interface for journal entries.
pub trait Storage {
    /// Inserts a new entry keyed by `entry.id`.
    fn create_entry(&self, entry: &Entry) -> StorageResult<()>;
    /// Loads one entry by id.
    fn get_entry(&self, id: &str) -> StorageResult<Entry>;
    /// Loads every stored entry. Order is not part of the contract.
    fn list_entries(&self) -> StorageResult<Vec<Entry>>;
    /// Overwrites title, content and updated time; `created` stays untouched.
    fn update_entry(&self, entry: &Entry) -> StorageResult<()>;
    /// Removes one entry permanently.
    fn delete_entry(&self, id: &str) -> StorageResult<()>;
    /// Inserts new entries and overwrites existing ones (by id).
    ///
    /// Existing rows keep their stored `created` value.
    fn save_entries(&self, entries: &[Entry]) -> StorageResult<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn create_entry(&self, entry: &Entry) -> StorageResult<()> {
        (**self).create_entry(entry)
    }

    fn get_entry(&self, id: &str) -> StorageResult<Entry> {
        (**self).get_entry(id)
    }

    fn list_entries(&self) -> StorageResult<Vec<Entry>> {
        (**self).list_entries()
    }

    fn update_entry(&self, entry: &Entry) -> StorageResult<()> {
        (**self).update_entry(entry)
    }

    fn delete_entry(&self, id: &str) -> StorageResult<()> {
        (**self).delete_entry(id)
    }

    fn save_entries(&self, entries: &[Entry]) -> StorageResult<()> {
        (**self).save_entries(entries)
    }
}
