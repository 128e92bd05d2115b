//! Core domain logic for the journal.
//! This crate is the single source of truth for entry invariants and the
//! storage contract shared by the CLI and HTTP front-ends.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use config::{open_storage, ConfigError, StorageConfig, StorageKind};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::entry::{Entry, EntryId, EntryUpdate, EntryValidationError};
pub use service::journal::{Journal, JournalError, JournalResult};
pub use storage::{
    DocumentStorage, DynStorage, SqliteStorage, Storage, StorageError, StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
