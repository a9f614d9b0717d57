//! Domain model for notebook records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every note is identified by its title.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
