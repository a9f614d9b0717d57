//! Notebook command layer.
//!
//! # Responsibility
//! - Tokenize one input line into a command name and arguments.
//! - Validate arity and translate commands into `NoteStore` calls.
//! - Turn results into user-facing text.
//!
//! # Invariants
//! - The notebook is always passed in by the caller.
//! - A failed command never ends the session; only `exit`/`close` do.

use crate::render::render_notes;
use log::debug;
use once_cell::sync::Lazy;
use pocketpal_core::{NoteStore, NoteStoreError};
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ARG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("valid argument regex"));

/// Every command understood by the notebook prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddNote,
    EditNote,
    ReplaceNote,
    ShowNotes,
    ShowNotesForContact,
    AddTag,
    RemoveTag,
    AttachNote,
    SearchNotes,
    DeleteNote,
    FindByTag,
    SortByTag,
    Help,
    Exit,
    Close,
}

/// Static description of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub cli_name: &'static str,
    pub description: &'static str,
    /// Required argument count.
    pub min_args: usize,
    /// Maximum argument count. `None` means trailing words are joined into
    /// the last argument.
    pub max_args: Option<usize>,
    pub usage: &'static str,
}

impl Command {
    pub const ALL: [Command; 15] = [
        Command::AddNote,
        Command::EditNote,
        Command::ReplaceNote,
        Command::ShowNotes,
        Command::ShowNotesForContact,
        Command::AddTag,
        Command::RemoveTag,
        Command::AttachNote,
        Command::SearchNotes,
        Command::DeleteNote,
        Command::FindByTag,
        Command::SortByTag,
        Command::Help,
        Command::Exit,
        Command::Close,
    ];

    pub fn spec(self) -> CommandSpec {
        let (cli_name, description, min_args, max_args, usage) = match self {
            Self::AddNote => (
                "add-note",
                "Adds a note attached to a contact.",
                2,
                None,
                "add-note [contact] [text]",
            ),
            Self::EditNote => (
                "edit-note",
                "Appends text to a note.",
                2,
                None,
                "edit-note [title] [text]",
            ),
            Self::ReplaceNote => (
                "replace-note",
                "Replaces the text of a note.",
                2,
                None,
                "replace-note [title] [text]",
            ),
            Self::ShowNotes => ("show-notes", "Shows all notes.", 0, Some(0), "show-notes"),
            Self::ShowNotesForContact => (
                "show-notes-for-contact",
                "Shows all notes attached to a contact.",
                1,
                Some(1),
                "show-notes-for-contact [name]",
            ),
            Self::AddTag => (
                "add-tag",
                "Adds a tag to a note.",
                2,
                Some(2),
                "add-tag [title] [tag]",
            ),
            Self::RemoveTag => (
                "remove-tag",
                "Removes a tag from a note.",
                2,
                Some(2),
                "remove-tag [title] [tag]",
            ),
            Self::AttachNote => (
                "attach-note",
                "Attaches a note to a contact.",
                2,
                Some(2),
                "attach-note [title] [contact]",
            ),
            Self::SearchNotes => (
                "search-notes",
                "Searches notes by text, tag or contact.",
                0,
                Some(1),
                "search-notes [query]",
            ),
            Self::DeleteNote => (
                "delete-note",
                "Deletes a note.",
                1,
                Some(1),
                "delete-note [title]",
            ),
            Self::FindByTag => (
                "find-by-tag",
                "Finds notes with a tag.",
                1,
                Some(1),
                "find-by-tag [tag]",
            ),
            Self::SortByTag => (
                "sort-by-tag",
                "Lists notes with a tag.",
                1,
                Some(1),
                "sort-by-tag [tag]",
            ),
            Self::Help => ("help", "Shows available commands.", 0, Some(0), "help"),
            Self::Exit => ("exit", "Saves the notebook and exits.", 0, Some(0), "exit"),
            Self::Close => ("close", "Saves the notebook and exits.", 0, Some(0), "close"),
        };
        CommandSpec {
            cli_name,
            description,
            min_args,
            max_args,
            usage,
        }
    }

    pub fn from_cli_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.spec().cli_name == name)
    }

    /// Checks arity and folds trailing words into the last argument.
    pub fn normalize_args(self, args: Vec<String>) -> Result<Vec<String>, CommandError> {
        let spec = self.spec();
        if args.len() < spec.min_args {
            return Err(CommandError::WrongArgs(spec.usage));
        }
        match spec.max_args {
            Some(max) if args.len() > max => Err(CommandError::WrongArgs(spec.usage)),
            Some(_) => Ok(args),
            None => {
                let mut args = args;
                let tail = args.split_off(spec.min_args - 1).join(" ");
                args.push(tail);
                Ok(args)
            }
        }
    }
}

/// Result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the message and keep reading commands.
    Continue(String),
    /// Print the message, save and end the session.
    Exit(String),
}

/// Error shown to the user as a warning; the session continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    InvalidCommand(String),
    WrongArgs(&'static str),
    Store(NoteStoreError),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCommand(_) => write!(f, "Invalid command."),
            Self::WrongArgs(usage) => write!(f, "Wrong args for command. Example: {usage}"),
            Self::Store(err) => write!(f, "Warning: {err}."),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteStoreError> for CommandError {
    fn from(value: NoteStoreError) -> Self {
        Self::Store(value)
    }
}

/// Splits a line into a lowercased command and its arguments.
///
/// Words are split on whitespace; a `"double quoted"` span is one argument
/// and may be empty. Returns `None` for blank input.
pub fn parse_input(line: &str) -> Option<(String, Vec<String>)> {
    let mut tokens = ARG_RE.captures_iter(line).map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|token| token.as_str().to_string())
            .unwrap_or_default()
    });
    let command = tokens.next()?.trim().to_lowercase();
    Some((command, tokens.collect()))
}

/// Parses and runs one input line. Returns `None` for blank input.
pub fn run_line(line: &str, store: &mut NoteStore) -> Option<Result<Outcome, CommandError>> {
    let (name, args) = parse_input(line)?;
    let result = Command::from_cli_name(&name)
        .ok_or(CommandError::InvalidCommand(name))
        .and_then(|command| execute(command, args, store));
    Some(result)
}

/// Runs one command against `store`.
pub fn execute(
    command: Command,
    args: Vec<String>,
    store: &mut NoteStore,
) -> Result<Outcome, CommandError> {
    let args = command.normalize_args(args)?;
    debug!(
        "event=command_run module=cli status=start command={}",
        command.spec().cli_name
    );

    let message = match (command, args.as_slice()) {
        (Command::AddNote, [contact, text]) => {
            let title = store.next_auto_title();
            store.add(title.as_str(), text.as_str());
            store.attach_to_contact(&title, contact)?;
            format!("Note '{title}' added.")
        }
        (Command::EditNote, [title, text]) => {
            store.edit(title, text)?;
            format!("Note edited to - {}.", body_of(store, title))
        }
        (Command::ReplaceNote, [title, text]) => {
            store.replace(title, text)?;
            format!("Note replaced to - {}.", body_of(store, title))
        }
        (Command::ShowNotes, []) => render_notes(&store.show_all()),
        (Command::ShowNotesForContact, [name]) => render_notes(&store.show_all_for_contact(name)?),
        (Command::AddTag, [title, tag]) => {
            store.add_tag(title, tag)?;
            format!("Tag added to note - {title}.")
        }
        (Command::RemoveTag, [title, tag]) => {
            store.remove_tag(title, tag)?;
            format!("Tag {tag} removed from note - {title}.")
        }
        (Command::AttachNote, [title, contact]) => {
            store.attach_to_contact(title, contact)?;
            format!("Note {title} attached to {contact}.")
        }
        (Command::SearchNotes, []) => render_notes(&store.search("")),
        (Command::SearchNotes, [query]) => render_notes(&store.search(query)),
        (Command::DeleteNote, [title]) => {
            store.delete(title)?;
            format!("Note {title} deleted.")
        }
        (Command::FindByTag, [tag]) => render_notes(&store.find_by_tag(tag)),
        (Command::SortByTag, [tag]) => render_notes(&store.sort_by_tag(tag)),
        (Command::Help, []) => help_text(),
        (Command::Exit | Command::Close, []) => return Ok(Outcome::Exit("Good bye!".to_string())),
        _ => return Err(CommandError::WrongArgs(command.spec().usage)),
    };

    Ok(Outcome::Continue(message))
}

/// Lists every command with its usage and description.
pub fn help_text() -> String {
    Command::ALL
        .iter()
        .map(|command| {
            let spec = command.spec();
            format!("{:<40} {}", spec.usage, spec.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn body_of<'a>(store: &'a NoteStore, title: &str) -> &'a str {
    store.find(title).map_or("", |note| note.body.as_str())
}

#[cfg(test)]
mod tests {
    use super::{parse_input, run_line, Command, CommandError, Outcome};
    use pocketpal_core::{NoteStore, NoteStoreError};

    fn run(line: &str, store: &mut NoteStore) -> Result<Outcome, CommandError> {
        run_line(line, store).expect("line should not be blank")
    }

    fn message(line: &str, store: &mut NoteStore) -> String {
        match run(line, store).unwrap() {
            Outcome::Continue(text) => text,
            Outcome::Exit(text) => panic!("unexpected exit: {text}"),
        }
    }

    #[test]
    fn parse_input_lowercases_command_and_keeps_quoted_spans() {
        let (command, args) =
            parse_input("  EDIT-NOTE note-1 \"and eggs please\" \"\"").unwrap();
        assert_eq!(command, "edit-note");
        assert_eq!(args, vec!["note-1", "and eggs please", ""]);

        assert!(parse_input("   ").is_none());
    }

    #[test]
    fn every_command_round_trips_through_cli_name() {
        for command in Command::ALL {
            assert_eq!(Command::from_cli_name(command.spec().cli_name), Some(command));
        }
        assert_eq!(Command::from_cli_name("add"), None);
    }

    #[test]
    fn unknown_command_and_wrong_arity_are_reported() {
        let mut store = NoteStore::new();

        let err = run("fly away", &mut store).unwrap_err();
        assert_eq!(err.to_string(), "Invalid command.");

        let err = run("delete-note", &mut store).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Wrong args for command. Example: delete-note [title]"
        );

        let err = run("add-tag a b c", &mut store).unwrap_err();
        assert_eq!(err, CommandError::WrongArgs("add-tag [title] [tag]"));
    }

    #[test]
    fn add_note_generates_title_and_attaches_contact() {
        let mut store = NoteStore::new();

        assert_eq!(message("add-note Ann buy milk", &mut store), "Note 'note-1' added.");
        let note = store.find("note-1").unwrap();
        assert_eq!(note.body, "buy milk");
        assert!(note.has_contact("Ann"));

        message("add-note Bob call back", &mut store);
        assert!(store.find("note-2").is_some());
    }

    #[test]
    fn edit_replace_and_delete_flow() {
        let mut store = NoteStore::new();
        message("add-note Ann buy milk", &mut store);

        assert_eq!(
            message("edit-note note-1 and eggs", &mut store),
            "Note edited to - buy milk and eggs."
        );
        assert_eq!(
            message("replace-note note-1 \"bread\"", &mut store),
            "Note replaced to - bread."
        );
        assert_eq!(message("delete-note note-1", &mut store), "Note note-1 deleted.");
        assert!(store.is_empty());
    }

    #[test]
    fn store_errors_surface_as_warnings() {
        let mut store = NoteStore::new();

        let err = run("edit-note ghost text", &mut store).unwrap_err();
        assert_eq!(
            err,
            CommandError::Store(NoteStoreError::NoteNotFound("ghost".to_string()))
        );
        assert!(err.to_string().starts_with("Warning:"));

        let err = run("show-notes-for-contact Zed", &mut store).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Store(NoteStoreError::ContactNotFound(_))
        ));
    }

    #[test]
    fn tag_commands_filter_notes() {
        let mut store = NoteStore::new();
        message("add-note Ann first", &mut store);
        message("add-note Bob second", &mut store);
        message("add-tag note-2 urgent", &mut store);

        let listed = message("find-by-tag urgent", &mut store);
        assert!(listed.contains("[note-2]"));
        assert!(!listed.contains("[note-1]"));
        assert_eq!(message("sort-by-tag urgent", &mut store), listed);

        message("remove-tag note-2 urgent", &mut store);
        assert_eq!(message("find-by-tag urgent", &mut store), "No notes found.");
    }

    #[test]
    fn search_without_query_lists_everything() {
        let mut store = NoteStore::new();
        message("add-note Ann first", &mut store);
        message("add-note Bob second", &mut store);

        let all = message("search-notes", &mut store);
        assert!(all.contains("[note-1]") && all.contains("[note-2]"));

        let by_contact = message("search-notes Bob", &mut store);
        assert!(by_contact.contains("[note-2]"));
        assert!(!by_contact.contains("[note-1]"));
    }

    #[test]
    fn exit_and_close_end_the_session() {
        let mut store = NoteStore::new();
        assert_eq!(
            run("exit", &mut store).unwrap(),
            Outcome::Exit("Good bye!".to_string())
        );
        assert!(matches!(run("CLOSE", &mut store).unwrap(), Outcome::Exit(_)));
    }
}
