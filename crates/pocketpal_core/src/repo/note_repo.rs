//! Notebook snapshot repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Write the whole in-memory notebook to SQLite and read it back.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save_snapshot` replaces every stored row in a single transaction.
//! - `load_snapshot` restores listing order, tag order (duplicates included),
//!   contacts and creation timestamps.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::note::Note;
use crate::store::note_store::NoteStore;
use log::info;
use rusqlite::{params, Connection, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "notebook database is missing table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "notebook table `{table}` is missing column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for whole-notebook snapshots.
pub trait NoteSnapshotRepository {
    /// Replaces the stored snapshot with `store`.
    fn save_snapshot(&mut self, store: &NoteStore) -> RepoResult<()>;
    /// Reads the stored snapshot. An empty database yields an empty store.
    fn load_snapshot(&self) -> RepoResult<NoteStore>;
}

/// SQLite-backed snapshot repository.
pub struct SqliteNoteSnapshotRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteSnapshotRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is
    ///   not the notebook schema.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_snapshot_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteSnapshotRepository for SqliteNoteSnapshotRepository<'_> {
    fn save_snapshot(&mut self, store: &NoteStore) -> RepoResult<()> {
        let started_at = Instant::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute_batch(
            "DELETE FROM note_contacts;
             DELETE FROM note_tags;
             DELETE FROM notes;",
        )?;

        {
            let mut insert_note = tx.prepare(
                "INSERT INTO notes (title, body, created_at, position)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            let mut insert_tag = tx.prepare(
                "INSERT INTO note_tags (note_title, position, tag)
                 VALUES (?1, ?2, ?3);",
            )?;
            let mut insert_contact = tx.prepare(
                "INSERT INTO note_contacts (note_title, contact)
                 VALUES (?1, ?2);",
            )?;

            for (position, note) in store.iter().enumerate() {
                insert_note.execute(params![
                    note.title.as_str(),
                    note.body.as_str(),
                    note.created_at,
                    to_db_position(position)?,
                ])?;
                for (tag_position, tag) in note.tags.iter().enumerate() {
                    insert_tag.execute(params![
                        note.title.as_str(),
                        to_db_position(tag_position)?,
                        tag.as_str(),
                    ])?;
                }
                for contact in &note.contacts {
                    insert_contact.execute(params![note.title.as_str(), contact.as_str()])?;
                }
            }
        }

        tx.commit()?;
        info!(
            "event=snapshot_save module=repo status=ok notes={} duration_ms={}",
            store.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn load_snapshot(&self) -> RepoResult<NoteStore> {
        let started_at = Instant::now();
        let mut tags = load_tags(self.conn)?;
        let mut contacts = load_contacts(self.conn)?;

        let mut stmt = self.conn.prepare(
            "SELECT title, body, created_at
             FROM notes
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut store = NoteStore::new();
        while let Some(row) = rows.next()? {
            let title: String = row.get("title")?;
            let mut note = Note::with_created_at(
                title.as_str(),
                row.get::<_, String>("body")?,
                row.get::<_, i64>("created_at")?,
            );
            note.tags = tags.remove(&title).unwrap_or_default();
            note.contacts = contacts.remove(&title).unwrap_or_default().into_iter().collect();
            store.insert(note);
        }

        if let Some(orphan) = tags.keys().chain(contacts.keys()).next() {
            return Err(RepoError::InvalidData(format!(
                "tag or contact rows reference missing note `{orphan}`"
            )));
        }

        info!(
            "event=snapshot_load module=repo status=ok notes={} duration_ms={}",
            store.len(),
            started_at.elapsed().as_millis()
        );
        Ok(store)
    }
}

fn load_tags(conn: &Connection) -> RepoResult<HashMap<String, Vec<String>>> {
    let mut stmt = conn.prepare(
        "SELECT note_title, tag
         FROM note_tags
         ORDER BY note_title ASC, position ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut tags: HashMap<String, Vec<String>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let title: String = row.get("note_title")?;
        tags.entry(title).or_default().push(row.get("tag")?);
    }
    Ok(tags)
}

fn load_contacts(conn: &Connection) -> RepoResult<HashMap<String, Vec<String>>> {
    let mut stmt = conn.prepare(
        "SELECT note_title, contact
         FROM note_contacts;",
    )?;
    let mut rows = stmt.query([])?;
    let mut contacts: HashMap<String, Vec<String>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let title: String = row.get("note_title")?;
        contacts.entry(title).or_default().push(row.get("contact")?);
    }
    Ok(contacts)
}

fn to_db_position(position: usize) -> RepoResult<i64> {
    i64::try_from(position)
        .map_err(|_| RepoError::InvalidData(format!("position {position} exceeds i64 range")))
}

fn ensure_snapshot_connection_ready(conn: &Connection) -> RepoResult<()> {
    const REQUIRED: &[(&str, &[&str])] = &[
        ("notes", &["title", "body", "created_at", "position"]),
        ("note_tags", &["note_title", "position", "tag"]),
        ("note_contacts", &["note_title", "contact"]),
    ];

    for &(table, columns) in REQUIRED {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
