//! Versioned schema for the catalog database
//!
//! SQL scripts live under `migrations/` in this crate and are compiled in.
//! `schema_version` records each applied script with its SHA256.

mod checksums;
mod embedded;
mod runner;

pub use runner::{applied_migrations, apply_migrations};
