//! Text rendering of entries for terminal output.

use journal_core::Entry;
use std::io::{self, Write};

pub const NO_ENTRIES: &str = "No entries found.";

/// Writes the list block for one entry (no `Updated` line).
pub fn write_summary(out: &mut impl Write, entry: &Entry) -> io::Result<()> {
    write!(
        out,
        " ID: {}\n Title: {}\n Content: {}\n Created: {}\n\n",
        entry.id,
        entry.title,
        entry.content,
        entry.created.to_rfc3339()
    )
}

/// Writes the detail block for one entry.
pub fn write_detail(out: &mut impl Write, entry: &Entry) -> io::Result<()> {
    write!(
        out,
        " ID: {}\n Title: {}\n Content: {}\n Created: {}\n Updated: {}\n\n",
        entry.id,
        entry.title,
        entry.content,
        entry.created.to_rfc3339(),
        entry.updated.to_rfc3339()
    )
}

/// Writes the two-line reply to a command name nobody handles.
pub fn write_unknown_command(out: &mut impl Write, name: &str, available: &str) -> io::Result<()> {
    writeln!(out, "Unknown command: {name}")?;
    writeln!(out, "Available commands: {available}")
}

/// Writes every entry as a list block, or the empty marker.
pub fn write_list(out: &mut impl Write, entries: &[Entry]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "{NO_ENTRIES}");
    }
    for entry in entries {
        write_summary(out, entry)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_detail, write_list};
    use chrono::{TimeZone, Utc};
    use journal_core::Entry;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn list_prints_blocks_or_empty_marker() {
        assert_eq!(render(|out| write_list(out, &[])), "No entries found.\n");

        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let entry = Entry::with_id("abc", "Walk", "Park loop", created);
        assert_eq!(
            render(|out| write_list(out, &[entry])),
            " ID: abc\n Title: Walk\n Content: Park loop\n Created: 2024-03-01T09:30:00+00:00\n\n"
        );
    }

    #[test]
    fn detail_includes_updated() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let entry = Entry::with_id("abc", "Walk", "Park loop", created);
        let text = render(|out| write_detail(out, &entry));
        assert!(text.contains(" Updated: 2024-03-01T09:30:00+00:00\n"));
    }
}
