//! PMS Database Tools Library
//!
//! Developer utilities for a project-management-system Postgres database:
//! a one-shot migration applier plus a few read-only inspection helpers.
//!
//! # Modules
//!
//! - `config`: Configuration loaded from the environment.
//! - `db`: Database pool management.
//! - `errors`: Error types shared by every binary.
//! - `inspect`: Table, column, row-sample, and join-check queries.
//! - `logging`: Tracing subscriber setup for the binaries.
//! - `migration`: Migration file loading and application.

pub mod config;
pub mod db;
pub mod errors;
pub mod inspect;
pub mod logging;
pub mod migration;
