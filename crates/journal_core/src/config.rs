//! Storage backend selection.
//!
//! # Responsibility
//! - Turn raw startup options into a validated `StorageConfig`.
//! - Open the configured backend behind the `Storage` trait.
//!
//! # Invariants
//! - Selecting the document backend without a connection URI is a startup
//!   error, never a runtime one.

use crate::storage::document::{DEFAULT_COLLECTION, DEFAULT_DATABASE};
use crate::storage::{DocumentStorage, DynStorage, SqliteStorage, StorageResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DB_PATH: &str = "journal.db";
pub const MONGODB_URI_ENV: &str = "MONGODB_URI";

/// Which backend to persist entries in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite,
    Document,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Document => "mongodb",
        }
    }
}

impl Display for StorageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "relational" => Ok(Self::Sqlite),
            "mongodb" | "mongo" | "document" => Ok(Self::Document),
            other => Err(ConfigError::UnknownStorage(other.to_string())),
        }
    }
}

/// Startup configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownStorage(String),
    MissingMongoUri,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStorage(value) => write!(
                f,
                "unsupported storage `{value}`; expected sqlite|mongodb"
            ),
            Self::MissingMongoUri => write!(
                f,
                "set your `{MONGODB_URI_ENV}` environment variable (or --mongodb-uri) to use the mongodb storage"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Validated backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Sqlite {
        path: PathBuf,
    },
    Document {
        uri: String,
        database: String,
        collection: String,
    },
}

impl StorageConfig {
    /// Builds a config from raw options, applying defaults.
    ///
    /// # Errors
    /// - `MissingMongoUri` when `kind` is `Document` and `mongodb_uri` is
    ///   absent or blank.
    pub fn resolve(
        kind: StorageKind,
        db_path: Option<PathBuf>,
        mongodb_uri: Option<String>,
        database: Option<String>,
        collection: Option<String>,
    ) -> Result<Self, ConfigError> {
        match kind {
            StorageKind::Sqlite => Ok(Self::Sqlite {
                path: db_path.unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            }),
            StorageKind::Document => {
                let uri = mongodb_uri
                    .map(|uri| uri.trim().to_string())
                    .filter(|uri| !uri.is_empty())
                    .ok_or(ConfigError::MissingMongoUri)?;
                Ok(Self::Document {
                    uri,
                    database: database.unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                    collection: collection.unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
                })
            }
        }
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            Self::Sqlite { .. } => StorageKind::Sqlite,
            Self::Document { .. } => StorageKind::Document,
        }
    }
}

/// Opens the configured backend.
pub fn open_storage(config: &StorageConfig) -> StorageResult<DynStorage> {
    info!(
        "event=storage_open module=config status=start storage={}",
        config.kind()
    );
    let storage: DynStorage = match config {
        StorageConfig::Sqlite { path } => Box::new(SqliteStorage::open(path)?),
        StorageConfig::Document {
            uri,
            database,
            collection,
        } => Box::new(DocumentStorage::connect(uri, database, collection)?),
    };
    Ok(storage)
}
