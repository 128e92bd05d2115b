use clap::Parser;
use journal_core::config::MONGODB_URI_ENV;
use journal_core::{ConfigError, StorageConfig, StorageKind};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Journal HTTP API server.
#[derive(Parser, Debug, Clone)]
#[command(name = "journal-web", version, about = "Journal HTTP API server")]
pub struct ServerArgs {
    /// Address to listen on.
    #[arg(long, env = "JOURNAL_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Storage backend (sqlite or mongodb).
    #[arg(long, env = "JOURNAL_STORAGE", default_value = "mongodb")]
    pub storage: StorageKind,

    /// SQLite database file.
    #[arg(long, env = "JOURNAL_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// MongoDB connection string.
    #[arg(long, env = MONGODB_URI_ENV, hide_env_values = true)]
    pub mongodb_uri: Option<String>,

    /// MongoDB database name.
    #[arg(long, env = "JOURNAL_MONGODB_DATABASE")]
    pub mongodb_database: Option<String>,

    /// MongoDB collection name.
    #[arg(long, env = "JOURNAL_MONGODB_COLLECTION")]
    pub mongodb_collection: Option<String>,

    /// Log level (trace|debug|info|warn|error|off).
    #[arg(long, env = "JOURNAL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr when unset.
    #[arg(long, env = "JOURNAL_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl ServerArgs {
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

#[cfg(test)]
mod tests {
    use super::ServerArgs;
    use clap::Parser;
    use journal_core::{ConfigError, StorageConfig, StorageKind};
    use std::path::PathBuf;

    #[test]
    fn sqlite_storage_from_flags() {
        let args = ServerArgs::try_parse_from([
            "journal-web",
            "--storage",
            "sqlite",
            "--db-path",
            "/tmp/web.db",
            "--bind",
            "127.0.0.1:9000",
        ])
        .unwrap();

        assert_eq!(args.storage, StorageKind::Sqlite);
        assert_eq!(args.bind.port(), 9000);
        assert_eq!(
            args.storage_config().unwrap(),
            StorageConfig::Sqlite {
                path: PathBuf::from("/tmp/web.db")
            }
        );
    }

    #[test]
    fn mongodb_without_uri_is_a_config_error() {
        let mut args =
            ServerArgs::try_parse_from(["journal-web", "--storage", "mongodb"]).unwrap();
        args.mongodb_uri = None;

        assert_eq!(args.storage_config(), Err(ConfigError::MissingMongoUri));
    }

    #[test]
    fn unknown_storage_is_rejected_by_parser() {
        assert!(ServerArgs::try_parse_from(["journal-web", "--storage", "redis"]).is_err());
    }
}
