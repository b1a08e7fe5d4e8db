//! chronicat store - SQLite persistence for documents and the change log
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - Document store and change-log store implementing the core storage ports
//! - Import-file parsing for bulk document loads

pub mod db;
pub mod errors;
pub mod import;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::{SqliteChangesetLog, SqliteDocumentStore};
