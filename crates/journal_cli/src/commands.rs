//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use journal_core::config::MONGODB_URI_ENV;
use journal_core::{ConfigError, StorageConfig, StorageKind};
use std::ffi::OsString;
use std::path::PathBuf;

/// Names listed after an unknown one-shot command.
pub const AVAILABLE_COMMANDS: &str =
    "create, list, get, update, delete, export, import, interactive";

#[derive(Parser, Debug)]
#[command(name = "journal")]
#[command(about = "Personal journal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub storage: StorageArgs,

    /// Log level (trace|debug|info|warn|error|off).
    #[arg(long, global = true, env = "JOURNAL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true, env = "JOURNAL_LOG_DIR")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Parses `args`, printing clap's message instead of exiting on failure.
///
/// Returns `None` for usage errors as well as `--help`/`--version`; the
/// caller exits with status 0 in both cases.
pub fn parse_cli<I, T>(args: I) -> Option<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Some(cli),
        Err(err) => {
            let _ = err.print();
            None
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct StorageArgs {
    /// Storage backend (sqlite or mongodb).
    #[arg(long, global = true, env = "JOURNAL_STORAGE", default_value = "sqlite")]
    pub storage: StorageKind,

    /// SQLite database file.
    #[arg(long, global = true, env = "JOURNAL_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// MongoDB connection string.
    #[arg(long, global = true, env = MONGODB_URI_ENV, hide_env_values = true)]
    pub mongodb_uri: Option<String>,

    /// MongoDB database name.
    #[arg(long, global = true, env = "JOURNAL_MONGODB_DATABASE")]
    pub mongodb_database: Option<String>,

    /// MongoDB collection name.
    #[arg(long, global = true, env = "JOURNAL_MONGODB_COLLECTION")]
    pub mongodb_collection: Option<String>,
}

impl StorageArgs {
    pub fn storage_config(&self) -> Result<StorageConfig, ConfigError> {
        StorageConfig::resolve(
            self.storage,
            self.db_path.clone(),
            self.mongodb_uri.clone(),
            self.mongodb_database.clone(),
            self.mongodb_collection.clone(),
        )
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create an entry and print its id
    Create {
        title: Option<String>,
        content: Option<String>,
    },

    /// List all entries
    List,

    /// Show one entry
    Get { id: Option<String> },

    /// Update an entry; omitted fields keep their value
    Update {
        id: Option<String>,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,
    },

    /// Delete an entry
    Delete { id: Option<String> },

    /// Print all entries as JSON
    Export,

    /// Insert or overwrite entries from a JSON file produced by `export`
    Import { file: Option<PathBuf> },

    /// Line-based interactive mode
    Interactive,

    #[command(external_subcommand)]
    Unknown(Vec<String>),
}
