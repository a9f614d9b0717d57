//! In-memory notebook store.
//!
//! # Responsibility
//! - Hold the notebook while a session runs.
//! - Surface semantic errors (`NoteNotFound`, `TagNotFound`, ...) to callers.
//!
//! # Invariants
//! - The store is owned by one caller and passed explicitly; there is no
//!   process-wide notebook.

pub mod note_store;
