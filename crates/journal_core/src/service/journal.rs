//! Journal use-case service.
//!
//! # Responsibility
//! - Own entry construction (id + timestamps) and the update merge policy.
//! - Delegate every persistence call to a `Storage` implementation.
//! - Normalize backend errors at the domain boundary.
//!
//! # Invariants
//! - Service APIs never bypass storage validation/persistence contracts.
//! - `get_entry` / `delete_entry` collapse any backend failure to `NotFound`.
//! - A failed lookup inside an update never reaches the write path.

use crate::model::entry::{now, Entry, EntryUpdate};
use crate::storage::{Storage, StorageError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type JournalResult<T> = Result<T, JournalError>;

/// Domain-level error for journal use-cases.
#[derive(Debug)]
pub enum JournalError {
    /// Requested entry is absent (or the backend could not produce it).
    NotFound,
    /// Backend call failed for any other reason.
    Storage(StorageError),
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "entry not found"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for JournalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for JournalError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(_) => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

/// Journal facade over one storage backend.
pub struct Journal<S: Storage> {
    storage: S,
}

impl<S: Storage> Journal<S> {
    /// Creates a journal using the provided storage implementation.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Creates and persists a new entry.
    ///
    /// # Contract
    /// - Assigns a fresh id and `created == updated == now`.
    /// - Performs exactly one durable write.
    pub fn create_entry(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> JournalResult<Entry> {
        let entry = Entry::new(title, content);
        self.storage.create_entry(&entry).map_err(|err| {
            warn!("event=entry_create module=journal status=error error={err}");
            JournalError::from(err)
        })?;
        info!(
            "event=entry_create module=journal status=ok entry_id={}",
            entry.id
        );
        Ok(entry)
    }

    /// Lists every stored entry as returned by the backend.
    pub fn list_entries(&self) -> JournalResult<Vec<Entry>> {
        let entries = self.storage.list_entries()?;
        debug!(
            "event=entry_list module=journal status=ok count={}",
            entries.len()
        );
        Ok(entries)
    }

    /// Loads one entry by id.
    ///
    /// Backend diagnostics are dropped; every failure reads as `NotFound`.
    pub fn get_entry(&self, id: &str) -> JournalResult<Entry> {
        self.storage.get_entry(id).map_err(|err| {
            debug!("event=entry_get module=journal status=error entry_id={id} error={err}");
            JournalError::NotFound
        })
    }

    /// Updates title/content where an empty string means "no change".
    pub fn update_entry(&self, id: &str, title: &str, content: &str) -> JournalResult<Entry> {
        self.patch_entry(id, &EntryUpdate::from_fields(title, content))
    }

    /// Applies a field-level update and refreshes `updated`.
    ///
    /// # Contract
    /// - Missing entries return `NotFound` without any write.
    /// - `created` is never modified.
    pub fn patch_entry(&self, id: &str, update: &EntryUpdate) -> JournalResult<Entry> {
        let mut entry = self.get_entry(id)?;
        entry.apply_update(update, now());

        self.storage.update_entry(&entry).map_err(|err| {
            warn!("event=entry_update module=journal status=error entry_id={id} error={err}");
            JournalError::from(err)
        })?;
        info!("event=entry_update module=journal status=ok entry_id={id}");
        Ok(entry)
    }

    /// Deletes one entry permanently.
    ///
    /// Every backend failure reads as `NotFound`.
    pub fn delete_entry(&self, id: &str) -> JournalResult<()> {
        match self.storage.delete_entry(id) {
            Ok(()) => {
                info!("event=entry_delete module=journal status=ok entry_id={id}");
                Ok(())
            }
            Err(err) => {
                debug!("event=entry_delete module=journal status=error entry_id={id} error={err}");
                Err(JournalError::NotFound)
            }
        }
    }

    /// Inserts or overwrites entries that already carry ids and timestamps.
    ///
    /// Returns the number of entries written.
    pub fn import_entries(&self, entries: &[Entry]) -> JournalResult<usize> {
        self.storage.save_entries(entries)?;
        info!(
            "event=entry_import module=journal status=ok count={}",
            entries.len()
        );
        Ok(entries.len())
    }
}
