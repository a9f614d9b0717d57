//! Repository layer for notebook persistence.
//!
//! # Responsibility
//! - Define the snapshot persistence contract used by load/save helpers.
//! - Isolate SQLite query details from the in-memory store.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`InvalidData`, missing schema)
//!   in addition to DB transport errors.

pub mod note_repo;
