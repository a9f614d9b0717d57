//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate db/repository calls into session-level load/save APIs.
//! - Keep the CLI decoupled from storage details.

pub mod notebook_service;
