//! In-memory notebook keyed by note title.
//!
//! # Responsibility
//! - Own every note of one notebook and the listing order.
//! - Provide edit/replace, tagging, contact attachment and search APIs.
//!
//! # Invariants
//! - A title identifies at most one note.
//! - Listing order is insertion order; overwriting a title keeps its slot.
//! - Existence and validation checks run before any mutation.

use crate::model::note::{validate_tag, Note, NoteValidationError};
use log::debug;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const AUTO_TITLE_PREFIX: &str = "note-";

pub type NoteStoreResult<T> = Result<T, NoteStoreError>;

/// Error returned by notebook operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteStoreError {
    /// No note has the given title.
    NoteNotFound(String),
    /// The note exists but does not carry the tag.
    TagNotFound { title: String, tag: String },
    /// No note references the given contact.
    ContactNotFound(String),
    /// Tag input failed validation.
    InvalidTag(NoteValidationError),
}

impl NoteStoreError {
    /// Returns whether this error reports a missing title, tag or contact.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoteNotFound(_) | Self::TagNotFound { .. } | Self::ContactNotFound(_)
        )
    }
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(title) => write!(f, "note with title `{title}` not found"),
            Self::TagNotFound { title, tag } => {
                write!(f, "tag `{tag}` not found on note `{title}`")
            }
            Self::ContactNotFound(name) => write!(f, "no notes found for contact `{name}`"),
            Self::InvalidTag(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTag(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for NoteStoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::InvalidTag(value)
    }
}

/// Keyed collection of notes (the "notebook").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteStore {
    notes: HashMap<String, Note>,
    order: Vec<String>,
}

impl NoteStore {
    /// Creates an empty notebook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notes in the notebook.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.notes.contains_key(title)
    }

    /// Adds a note with empty tags and contacts.
    ///
    /// An existing note with the same title is replaced silently.
    pub fn add(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.insert(Note::new(title, body));
    }

    /// Adds a fully-built note, replacing any note with the same title.
    pub fn insert(&mut self, note: Note) {
        let title = note.title.clone();
        let replaced = self.notes.insert(title.clone(), note);
        if replaced.is_none() {
            self.order.push(title);
        }
        debug!(
            "event=note_add module=store status=ok replaced={} count={}",
            replaced.is_some(),
            self.len()
        );
    }

    /// Looks up one note by title.
    pub fn find(&self, title: &str) -> Option<&Note> {
        self.notes.get(title)
    }

    /// Removes one note.
    ///
    /// # Errors
    /// - `NoteNotFound` when the title is absent.
    pub fn delete(&mut self, title: &str) -> NoteStoreResult<()> {
        if self.notes.remove(title).is_none() {
            return Err(NoteStoreError::NoteNotFound(title.to_string()));
        }
        self.order.retain(|value| value != title);
        debug!(
            "event=note_delete module=store status=ok count={}",
            self.len()
        );
        Ok(())
    }

    /// Appends `" " + text` to the body.
    pub fn edit(&mut self, title: &str, text: &str) -> NoteStoreResult<()> {
        self.note_mut(title)?.append_body(text);
        Ok(())
    }

    /// Overwrites the body with `text`.
    pub fn replace(&mut self, title: &str, text: &str) -> NoteStoreResult<()> {
        self.note_mut(title)?.replace_body(text);
        Ok(())
    }

    /// Adds `contact_name` to the note's contact set. Idempotent.
    ///
    /// The name is not checked against any address book.
    pub fn attach_to_contact(&mut self, title: &str, contact_name: &str) -> NoteStoreResult<()> {
        self.note_mut(title)?.attach_contact(contact_name);
        Ok(())
    }

    /// Appends `tag` to the note's tags.
    ///
    /// # Errors
    /// - `NoteNotFound` when the title is absent.
    /// - `InvalidTag` when the tag is not 1..=20 characters long.
    pub fn add_tag(&mut self, title: &str, tag: &str) -> NoteStoreResult<()> {
        let note = self.note_mut(title)?;
        validate_tag(tag)?;
        note.push_tag(tag);
        Ok(())
    }

    /// Removes the first occurrence of `tag` from the note's tags.
    ///
    /// # Errors
    /// - `NoteNotFound` when the title is absent.
    /// - `TagNotFound` when the note does not carry the tag.
    pub fn remove_tag(&mut self, title: &str, tag: &str) -> NoteStoreResult<()> {
        if self.note_mut(title)?.remove_first_tag(tag) {
            Ok(())
        } else {
            Err(NoteStoreError::TagNotFound {
                title: title.to_string(),
                tag: tag.to_string(),
            })
        }
    }

    /// Returns notes matching `query`; an empty query returns every note.
    ///
    /// Title and body use substring matching, tags and contacts use exact
    /// matching. See [`Note::matches_query`].
    pub fn search(&self, query: &str) -> Vec<&Note> {
        if query.is_empty() {
            return self.show_all();
        }
        self.filter(|note| note.matches_query(query))
    }

    /// Returns every note in listing order.
    pub fn show_all(&self) -> Vec<&Note> {
        self.iter().collect()
    }

    /// Returns notes attached to `name`.
    ///
    /// # Errors
    /// - `ContactNotFound` when no note references the contact.
    pub fn show_all_for_contact(&self, name: &str) -> NoteStoreResult<Vec<&Note>> {
        let notes = self.filter(|note| note.has_contact(name));
        if notes.is_empty() {
            return Err(NoteStoreError::ContactNotFound(name.to_string()));
        }
        Ok(notes)
    }

    /// Returns notes carrying `tag` exactly. Empty when none match.
    pub fn find_by_tag(&self, tag: &str) -> Vec<&Note> {
        self.filter(|note| note.has_tag(tag))
    }

    /// Same filter as [`NoteStore::find_by_tag`], in listing order.
    pub fn sort_by_tag(&self, tag: &str) -> Vec<&Note> {
        self.find_by_tag(tag)
    }

    /// Returns the first free `note-N` title, starting at `len() + 1`.
    pub fn next_auto_title(&self) -> String {
        let mut index = self.len() + 1;
        loop {
            let candidate = format!("{AUTO_TITLE_PREFIX}{index}");
            if !self.contains(&candidate) {
                return candidate;
            }
            index += 1;
        }
    }

    /// Iterates notes in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.order.iter().filter_map(|title| self.notes.get(title))
    }

    fn filter(&self, predicate: impl Fn(&Note) -> bool) -> Vec<&Note> {
        self.iter().filter(|&note| predicate(note)).collect()
    }

    fn note_mut(&mut self, title: &str) -> NoteStoreResult<&mut Note> {
        self.notes
            .get_mut(title)
            .ok_or_else(|| NoteStoreError::NoteNotFound(title.to_string()))
    }
}

impl FromIterator<Note> for NoteStore {
    fn from_iter<T: IntoIterator<Item = Note>>(iter: T) -> Self {
        let mut store = Self::new();
        for note in iter {
            store.insert(note);
        }
        store
    }
}
