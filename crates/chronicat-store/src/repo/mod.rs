//! SQLite repositories implementing the core storage ports

mod changeset_repo;
mod document_repo;

pub use changeset_repo::SqliteChangesetLog;
pub use document_repo::SqliteDocumentStore;
