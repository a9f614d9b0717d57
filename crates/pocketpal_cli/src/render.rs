//! Plain-text rendering of notebook results.

use chrono::{DateTime, Local, TimeZone, Utc};
use pocketpal_core::Note;
use std::fmt::Display;
use std::fmt::Write as _;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const EMPTY_LIST: &str = "No notes found.";

/// Renders a list of notes, one block per note.
pub fn render_notes(notes: &[&Note]) -> String {
    if notes.is_empty() {
        return EMPTY_LIST.to_string();
    }
    notes
        .iter()
        .map(|note| render_note(note))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Renders one note with its creation date in local time.
pub fn render_note(note: &Note) -> String {
    render_note_in(note, &Local)
}

fn render_note_in<Tz>(note: &Note, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", note.title, format_timestamp(note.created_at, tz));
    let _ = writeln!(out, "  {}", note.body);
    if !note.tags.is_empty() {
        let _ = writeln!(out, "  tags: {}", note.tags.join(", "));
    }
    if !note.contacts.is_empty() {
        let contacts: Vec<&str> = note.contacts.iter().map(String::as_str).collect();
        let _ = writeln!(out, "  contacts: {}", contacts.join(", "));
    }
    out
}

fn format_timestamp<Tz>(epoch_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|utc| utc.with_timezone(tz).format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, render_note_in, render_notes};
    use chrono::Utc;
    use pocketpal_core::Note;

    #[test]
    fn formats_epoch_millis_as_calendar_time() {
        assert_eq!(
            format_timestamp(1_700_000_000_000, &Utc),
            "2023-11-14 22:13:20"
        );
    }

    #[test]
    fn renders_tags_and_contacts_only_when_present() {
        let bare = Note::with_created_at("n1", "buy milk", 0);
        let rendered = render_note_in(&bare, &Utc);
        assert_eq!(rendered, "[n1] 1970-01-01 00:00:00\n  buy milk\n");

        let full = Note::with_created_at("n2", "call", 0)
            .with_tags(["a", "b"])
            .with_contacts(["Bob", "Ann"]);
        let rendered = render_note_in(&full, &Utc);
        assert!(rendered.contains("  tags: a, b\n"));
        assert!(rendered.contains("  contacts: Ann, Bob\n"));
    }

    #[test]
    fn empty_list_has_placeholder() {
        assert_eq!(render_notes(&[]), "No notes found.");
    }
}
