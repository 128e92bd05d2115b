//! Journal command-line entry point.
//!
//! # Responsibility
//! - Parse one-shot commands and dispatch them to `Journal`.
//! - Host the interactive line mode.
//!
//! # Invariants
//! - Operation failures and usage errors are printed and exit with status 0.
//! - Only startup failures (configuration, storage open, logging) exit non-zero.

mod commands;
mod output;
mod repl;

use commands::{parse_cli, Commands, AVAILABLE_COMMANDS};
use journal_core::{init_logging, open_storage, DynStorage, Entry, EntryUpdate, Journal};
use log::info;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

const UPDATE_USAGE: &str = "usage: journal update [id] [--title <title>] [--content <content>]";

fn main() -> ExitCode {
    let Some(cli) = parse_cli(std::env::args_os()) else {
        return ExitCode::SUCCESS;
    };

    if let Some(dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or("info");
        if let Err(err) = init_logging(level, dir) {
            eprintln!("Failed to initialize logging: {err}");
            return ExitCode::FAILURE;
        }
    }

    let Some(command) = cli.command else {
        println!("usage: journal [command] [arguments]");
        return ExitCode::SUCCESS;
    };

    if let Commands::Unknown(args) = &command {
        if let Err(err) = write_unknown_command(&mut io::stdout().lock(), args) {
            eprintln!("Error: {err}");
        }
        return ExitCode::SUCCESS;
    }

    let journal = match cli
        .storage
        .storage_config()
        .map_err(|err| err.to_string())
        .and_then(|config| open_storage(&config).map_err(|err| err.to_string()))
    {
        Ok(storage) => Journal::new(storage),
        Err(err) => {
            eprintln!("Error initializing storage: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!("event=cli_start module=cli status=ok");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = run(&journal, command, &mut out) {
        eprintln!("Error: {err}");
    }
    ExitCode::SUCCESS
}

fn run(journal: &Journal<DynStorage>, command: Commands, out: &mut impl Write) -> io::Result<()> {
    match command {
        Commands::Create {
            title: Some(title),
            content: Some(content),
        } => match journal.create_entry(title, content) {
            Ok(entry) => writeln!(out, "Created entry: {}", entry.id),
            Err(err) => writeln!(out, "{err}"),
        },
        Commands::Create { .. } => writeln!(out, "usage: journal create [title] [content]"),
        Commands::List => match journal.list_entries() {
            Ok(entries) => output::write_list(out, &entries),
            Err(err) => writeln!(out, "{err}"),
        },
        Commands::Get { id: Some(id) } => match journal.get_entry(&id) {
            Ok(entry) => output::write_detail(out, &entry),
            Err(err) => writeln!(out, "{err}"),
        },
        Commands::Get { id: None } => writeln!(out, "usage: journal get [id]"),
        Commands::Update {
            id: Some(id),
            title,
            content,
        } => {
            let update = EntryUpdate { title, content };
            if update.is_empty() {
                return writeln!(out, "{UPDATE_USAGE}");
            }
            match journal.patch_entry(&id, &update) {
                Ok(entry) => output::write_detail(out, &entry),
                Err(err) => writeln!(out, "{err}"),
            }
        }
        Commands::Update { id: None, .. } => writeln!(out, "{UPDATE_USAGE}"),
        Commands::Delete { id: Some(id) } => match journal.delete_entry(&id) {
            Ok(()) => writeln!(out, "Deleted entry: {id}"),
            Err(err) => writeln!(out, "{err}"),
        },
        Commands::Delete { id: None } => writeln!(out, "usage: journal delete [id]"),
        Commands::Export => match journal.list_entries() {
            Ok(entries) => {
                let json = serde_json::to_string_pretty(&entries).map_err(io::Error::other)?;
                writeln!(out, "{json}")
            }
            Err(err) => writeln!(out, "{err}"),
        },
        Commands::Import { file: Some(file) } => match import(journal, &file) {
            Ok(count) => writeln!(out, "Imported {count} entries."),
            Err(err) => writeln!(out, "{err}"),
        },
        Commands::Import { file: None } => writeln!(out, "usage: journal import [file]"),
        Commands::Interactive => {
            let stdin = io::stdin();
            repl::run(journal, &mut stdin.lock(), out)
        }
        Commands::Unknown(args) => write_unknown_command(out, &args),
    }
}

fn write_unknown_command(out: &mut impl Write, args: &[String]) -> io::Result<()> {
    let name = args.first().map(String::as_str).unwrap_or_default();
    output::write_unknown_command(out, name, AVAILABLE_COMMANDS)
}

fn import(journal: &Journal<DynStorage>, file: &Path) -> Result<usize, String> {
    let raw = std::fs::read_to_string(file)
        .map_err(|err| format!("failed to read `{}`: {err}", file.display()))?;
    let entries: Vec<Entry> = serde_json::from_str(&raw)
        .map_err(|err| format!("invalid entries in `{}`: {err}", file.display()))?;
    journal.import_entries(&entries).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{import, run};
    use crate::commands::Commands;
    use journal_core::{DynStorage, Journal, SqliteStorage};

    fn journal() -> Journal<DynStorage> {
        let storage: DynStorage = Box::new(SqliteStorage::open_in_memory().unwrap());
        Journal::new(storage)
    }

    fn exec(journal: &Journal<DynStorage>, command: Commands) -> String {
        let mut out = Vec::new();
        run(journal, command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn create_prints_id() {
        let journal = journal();

        let text = exec(
            &journal,
            Commands::Create {
                title: Some("Title".to_string()),
                content: Some("Body".to_string()),
            },
        );

        let entries = journal.list_entries().unwrap();
        assert_eq!(text, format!("Created entry: {}\n", entries[0].id));
    }

    #[test]
    fn create_without_content_prints_usage() {
        let journal = journal();

        let text = exec(
            &journal,
            Commands::Create {
                title: Some("Title".to_string()),
                content: None,
            },
        );

        assert_eq!(text, "usage: journal create [title] [content]\n");
        assert!(journal.list_entries().unwrap().is_empty());
    }

    #[test]
    fn list_on_empty_journal() {
        assert_eq!(exec(&journal(), Commands::List), "No entries found.\n");
    }

    #[test]
    fn update_keeps_omitted_fields() {
        let journal = journal();
        let entry = journal.create_entry("Title A", "Body A").unwrap();

        exec(
            &journal,
            Commands::Update {
                id: Some(entry.id.clone()),
                title: Some("Title B".to_string()),
                content: None,
            },
        );

        let loaded = journal.get_entry(&entry.id).unwrap();
        assert_eq!(loaded.title, "Title B");
        assert_eq!(loaded.content, "Body A");
    }

    #[test]
    fn update_without_fields_prints_usage() {
        let journal = journal();
        let entry = journal.create_entry("Title A", "Body A").unwrap();

        let text = exec(
            &journal,
            Commands::Update {
                id: Some(entry.id.clone()),
                title: None,
                content: None,
            },
        );

        assert_eq!(
            text,
            "usage: journal update [id] [--title <title>] [--content <content>]\n"
        );
        assert_eq!(journal.get_entry(&entry.id).unwrap(), entry);
    }

    #[test]
    fn unknown_command_lists_available_commands() {
        let text = exec(
            &journal(),
            Commands::Unknown(vec!["frobnicate".to_string(), "x".to_string()]),
        );

        assert_eq!(
            text,
            "Unknown command: frobnicate\n\
             Available commands: create, list, get, update, delete, export, import, interactive\n"
        );
    }

    #[test]
    fn missing_ids_print_not_found() {
        let journal = journal();

        let get = exec(
            &journal,
            Commands::Get {
                id: Some("nonexistent-id".to_string()),
            },
        );
        let delete = exec(
            &journal,
            Commands::Delete {
                id: Some("nonexistent-id".to_string()),
            },
        );

        assert_eq!(get, "entry not found\n");
        assert_eq!(delete, "entry not found\n");
    }

    #[test]
    fn export_then_import_into_another_journal() {
        let source = journal();
        source.create_entry("one", "first").unwrap();
        source.create_entry("two", "second").unwrap();

        let exported = exec(&source, Commands::Export);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        std::fs::write(&path, exported).unwrap();

        let target = journal();
        let text = exec(
            &target,
            Commands::Import {
                file: Some(path.clone()),
            },
        );

        assert_eq!(text, "Imported 2 entries.\n");
        let mut imported = target.list_entries().unwrap();
        let mut original = source.list_entries().unwrap();
        imported.sort_by(|a, b| a.id.cmp(&b.id));
        original.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(imported, original);

        assert_eq!(import(&target, &path).unwrap(), 2);
        assert_eq!(target.list_entries().unwrap().len(), 2);
    }

    #[test]
    fn import_reports_unreadable_files() {
        let journal = journal();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let err = import(&journal, &path).unwrap_err();
        assert!(err.starts_with("invalid entries in"));
    }
}
