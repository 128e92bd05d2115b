//! Line-based interactive mode.
//!
//! # Responsibility
//! - Drive `Journal` operations from prompted stdin lines.
//! - Ask per field before replacing it on update.
//!
//! # Invariants
//! - Operation errors are printed and the loop continues.
//! - End of input behaves like `exit`.

use crate::output::{write_detail, write_list, write_unknown_command};
use journal_core::{EntryUpdate, Journal, Storage};
use std::io::{self, BufRead, Write};

const AVAILABLE_COMMANDS: &str = "create, list, get, delete, update";

/// Runs the interactive loop until `exit` or end of input.
pub fn run<S, R, W>(journal: &Journal<S>, input: &mut R, out: &mut W) -> io::Result<()>
where
    S: Storage,
    R: BufRead,
    W: Write,
{
    writeln!(out, "You are in the Journal program in interactive mode")?;

    loop {
        writeln!(out, "usage: create | list | get | update | delete")?;
        writeln!(out, "Type 'exit' to quit.")?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            writeln!(out, "Exiting...")?;
            return Ok(());
        };

        let keep_going = match line.trim() {
            "exit" => {
                writeln!(out, "Exiting...")?;
                return Ok(());
            }
            "" => true,
            "create" => create(journal, input, out)?,
            "list" => {
                match journal.list_entries() {
                    Ok(entries) => write_list(out, &entries)?,
                    Err(err) => writeln!(out, "{err}")?,
                }
                true
            }
            "get" => get(journal, input, out)?,
            "update" => update(journal, input, out)?,
            "delete" => delete(journal, input, out)?,
            other => {
                write_unknown_command(out, other, AVAILABLE_COMMANDS)?;
                true
            }
        };

        if !keep_going {
            writeln!(out, "Exiting...")?;
            return Ok(());
        }
    }
}

/// Each command returns `Ok(false)` when input ended mid-command.
fn create<S: Storage>(
    journal: &Journal<S>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<bool> {
    let Some(title) = prompt(input, out, "Enter entry title")? else {
        return Ok(false);
    };
    let Some(content) = prompt(input, out, "Enter entry content")? else {
        return Ok(false);
    };

    match journal.create_entry(title, content) {
        Ok(entry) => writeln!(out, "Created entry: {}", entry.id)?,
        Err(err) => writeln!(out, "{err}")?,
    }
    Ok(true)
}

fn get<S: Storage>(
    journal: &Journal<S>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<bool> {
    let Some(id) = prompt(input, out, "Enter entry ID")? else {
        return Ok(false);
    };

    match journal.get_entry(id.trim()) {
        Ok(entry) => write_detail(out, &entry)?,
        Err(err) => writeln!(out, "{err}")?,
    }
    Ok(true)
}

fn delete<S: Storage>(
    journal: &Journal<S>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<bool> {
    let Some(id) = prompt(input, out, "Enter entry ID")? else {
        return Ok(false);
    };

    let id = id.trim();
    match journal.delete_entry(id) {
        Ok(()) => writeln!(out, "Deleted entry: {id}")?,
        Err(err) => writeln!(out, "{err}")?,
    }
    Ok(true)
}

fn update<S: Storage>(
    journal: &Journal<S>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<bool> {
    let Some(id) = prompt(input, out, "Enter entry ID")? else {
        return Ok(false);
    };

    let mut update = EntryUpdate::default();
    for (field, slot) in [("title", &mut update.title), ("content", &mut update.content)] {
        let Some(answer) = prompt(input, out, &format!("Do you want to update the {field}? Y/N"))?
        else {
            return Ok(false);
        };
        if !answer.trim().eq_ignore_ascii_case("y") {
            continue;
        }
        let Some(value) = prompt(input, out, &format!("Enter new {field}"))? else {
            return Ok(false);
        };
        *slot = Some(value);
    }

    match journal.patch_entry(id.trim(), &update) {
        Ok(entry) => write_detail(out, &entry)?,
        Err(err) => writeln!(out, "{err}")?,
    }
    Ok(true)
}

fn prompt(
    input: &mut impl BufRead,
    out: &mut impl Write,
    message: &str,
) -> io::Result<Option<String>> {
    writeln!(out, "{message}")?;
    out.flush()?;
    read_line(input)
}

/// Reads one line without its terminator; `None` at end of input.
fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}
