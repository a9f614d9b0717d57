//! Notebook load/save helpers.
//!
//! # Responsibility
//! - Restore the notebook at session start and persist it at session end.
//! - Keep file-system concerns (missing file, parent directories) out of
//!   the store and the repository.
//!
//! # Invariants
//! - A missing notebook file loads as an empty store, never an error.
//! - Saving writes a complete snapshot; there are no partial saves.

use crate::db::{open_db, DbError};
use crate::repo::note_repo::{NoteSnapshotRepository, RepoError, SqliteNoteSnapshotRepository};
use crate::store::note_store::NoteStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::Path;

pub type NotebookResult<T> = Result<T, NotebookError>;

/// Error for notebook file operations.
#[derive(Debug)]
pub enum NotebookError {
    Io(io::Error),
    Db(DbError),
    Repo(RepoError),
}

impl Display for NotebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "notebook file error: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotebookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<io::Error> for NotebookError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for NotebookError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for NotebookError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Loads the notebook stored at `path`.
///
/// Returns an empty store when the file does not exist.
pub fn load_notebook(path: impl AsRef<Path>) -> NotebookResult<NoteStore> {
    let path = path.as_ref();
    if !path.try_exists()? {
        info!("event=notebook_load module=service status=ok source=empty");
        return Ok(NoteStore::new());
    }

    let mut conn = open_db(path)?;
    let repo = SqliteNoteSnapshotRepository::try_new(&mut conn)?;
    let store = repo.load_snapshot()?;
    info!(
        "event=notebook_load module=service status=ok source=file notes={}",
        store.len()
    );
    Ok(store)
}

/// Writes `store` to `path`, creating parent directories when needed.
pub fn save_notebook(path: impl AsRef<Path>, store: &NoteStore) -> NotebookResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut conn = open_db(path)?;
    let mut repo = SqliteNoteSnapshotRepository::try_new(&mut conn)?;
    repo.save_snapshot(store)?;
    Ok(())
}

/// Removes the notebook file at `path`. A missing file is not an error.
pub fn delete_notebook(path: impl AsRef<Path>) -> NotebookResult<()> {
    match std::fs::remove_file(path.as_ref()) {
        Ok(()) => {
            info!("event=notebook_delete module=service status=ok");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!("event=notebook_delete module=service status=skipped reason=missing_file");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
