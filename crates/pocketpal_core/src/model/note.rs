//! Note domain model.
//!
//! # Responsibility
//! - Define the titled text record kept by the notebook.
//! - Own the matching rules used by search and tag/contact filters.
//!
//! # Invariants
//! - `title` is the identity of a note and never changes after creation.
//! - `created_at` is stamped once at creation and never changes.
//! - `tags` keeps insertion order and allows duplicates.
//! - `contacts` has set semantics; attaching a name twice keeps one entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Minimum tag length, in characters.
pub const TAG_MIN_CHARS: usize = 1;
/// Maximum tag length, in characters.
pub const TAG_MAX_CHARS: usize = 20;

/// Validation error for note field input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Tag length is outside `TAG_MIN_CHARS..=TAG_MAX_CHARS`.
    InvalidTagLength { tag: String, len: usize },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTagLength { tag, len } => write!(
                f,
                "tag `{tag}` has {len} characters; tags must be between {TAG_MIN_CHARS} and {TAG_MAX_CHARS} characters"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// A titled, tagged, optionally contact-linked text record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique key inside a notebook.
    pub title: String,
    /// Free-form text body.
    pub body: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Free-text labels, matched by exact equality.
    pub tags: Vec<String>,
    /// Names of address-book contacts this note references.
    pub contacts: BTreeSet<String>,
}

impl Note {
    /// Creates a note stamped with the current wall clock.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_created_at(title, body, now_epoch_ms())
    }

    /// Creates a note with a caller-provided creation timestamp.
    ///
    /// Used by the snapshot load path where the timestamp already exists.
    pub fn with_created_at(
        title: impl Into<String>,
        body: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            created_at,
            tags: Vec::new(),
            contacts: BTreeSet::new(),
        }
    }

    /// Replaces the tag sequence. Tags are kept as given, duplicates included.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the contact set.
    pub fn with_contacts<I, S>(mut self, contacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contacts = contacts.into_iter().map(Into::into).collect();
        self
    }

    /// Returns whether `tag` is an exact element of the tag sequence.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|value| value == tag)
    }

    /// Returns whether `name` is in the contact set.
    pub fn has_contact(&self, name: &str) -> bool {
        self.contacts.contains(name)
    }

    /// Notebook search rule.
    ///
    /// Matches when `query` is a substring of the title or body, or equals
    /// one tag or one contact exactly. An empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        self.title.contains(query)
            || self.body.contains(query)
            || self.has_tag(query)
            || self.has_contact(query)
    }

    pub(crate) fn append_body(&mut self, text: &str) {
        self.body.push(' ');
        self.body.push_str(text);
    }

    pub(crate) fn replace_body(&mut self, text: impl Into<String>) {
        self.body = text.into();
    }

    pub(crate) fn push_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    /// Removes the first occurrence of `tag`. Returns `false` when absent.
    pub(crate) fn remove_first_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|value| value == tag) {
            Some(index) => {
                self.tags.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn attach_contact(&mut self, name: impl Into<String>) {
        self.contacts.insert(name.into());
    }
}

/// Checks one tag against the notebook tag rule.
///
/// # Errors
/// - Returns `InvalidTagLength` when the tag is empty or longer than
///   `TAG_MAX_CHARS` characters.
pub fn validate_tag(tag: &str) -> Result<(), NoteValidationError> {
    let len = tag.chars().count();
    if (TAG_MIN_CHARS..=TAG_MAX_CHARS).contains(&len) {
        Ok(())
    } else {
        Err(NoteValidationError::InvalidTagLength {
            tag: tag.to_string(),
            len,
        })
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{validate_tag, Note, NoteValidationError};

    #[test]
    fn validate_tag_accepts_bounds() {
        assert!(validate_tag("a").is_ok());
        assert!(validate_tag(&"x".repeat(20)).is_ok());
    }

    #[test]
    fn validate_tag_rejects_empty_and_long_values() {
        assert_eq!(
            validate_tag("").unwrap_err(),
            NoteValidationError::InvalidTagLength {
                tag: String::new(),
                len: 0
            }
        );
        assert!(validate_tag(&"x".repeat(21)).is_err());
    }

    #[test]
    fn validate_tag_counts_characters_not_bytes() {
        assert!(validate_tag(&"é".repeat(20)).is_ok());
    }

    #[test]
    fn remove_first_tag_only_drops_one_duplicate() {
        let mut note = Note::new("n", "b").with_tags(["x", "y", "x"]);
        assert!(note.remove_first_tag("x"));
        assert_eq!(note.tags, vec!["y".to_string(), "x".to_string()]);
        assert!(!note.remove_first_tag("z"));
    }
}
