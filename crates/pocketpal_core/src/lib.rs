//! Core domain logic for PocketPal notes.
//! This crate is the single source of truth for notebook invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{validate_tag, Note, NoteValidationError, TAG_MAX_CHARS, TAG_MIN_CHARS};
pub use repo::note_repo::{
    NoteSnapshotRepository, RepoError, RepoResult, SqliteNoteSnapshotRepository,
};
pub use service::notebook_service::{
    delete_notebook, load_notebook, save_notebook, NotebookError, NotebookResult,
};
pub use store::note_store::{NoteStore, NoteStoreError, NoteStoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
