//! Storage ports
//!
//! The assembler and paged retrieval talk to storage only through these
//! traits. `chronicat-store` provides SQLite implementations, and
//! [`crate::memory::MemoryStore`] provides an in-memory one for tests.

use crate::changeset::{Changeset, ChangesetRecord};
use crate::errors::Result;
use crate::tree::Tree;
use crate::window::ChangesetQuery;

/// Read access to the current version of catalog documents.
pub trait DocumentSource {
    /// Fetch the stored document with the given id.
    ///
    /// # Errors
    ///
    /// Any storage failure. A missing document is `Ok(None)`, not an error.
    fn get_by_id(&self, id: &str) -> Result<Option<Tree>>;
}

/// Result of a create-only changeset insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A changeset with the same `(document, order)` already exists.
    Conflict,
}

/// Sort position of a record in the log's read order.
///
/// Reads are ordered by `timestamp_ms` descending, then `document` ascending,
/// then `order` descending. Comparing two cursors follows that read order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub timestamp_ms: i64,
    pub document: String,
    pub order: i64,
}

impl PageCursor {
    pub fn of(record: &ChangesetRecord) -> Self {
        Self {
            timestamp_ms: record.timestamp.timestamp_millis(),
            document: record.document.clone(),
            order: record.order,
        }
    }
}

impl Ord for PageCursor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .timestamp_ms
            .cmp(&self.timestamp_ms)
            .then_with(|| self.document.cmp(&other.document))
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for PageCursor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// One page of a paged read: up to `size` records strictly after `after`.
///
/// Pages are keyed on the last record already read, so records committed
/// between two fetches never shift a later page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub after: Option<PageCursor>,
    pub size: usize,
}

impl PageRequest {
    pub fn first(size: usize) -> Self {
        Self { after: None, size }
    }

    pub fn after(cursor: PageCursor, size: usize) -> Self {
        Self {
            after: Some(cursor),
            size,
        }
    }
}

/// The append-only change log.
pub trait ChangesetLog {
    /// Insert a changeset unless its `(document, order)` is taken.
    ///
    /// # Errors
    ///
    /// Storage failures. A duplicate key is reported as `InsertOutcome::Conflict`.
    fn insert_if_absent(&self, changeset: &Changeset) -> Result<InsertOutcome>;

    /// The changeset with the highest order for a document.
    ///
    /// # Errors
    ///
    /// Storage failures, including a stored record that cannot be decoded.
    fn last_for_document(&self, document_id: &str) -> Result<Option<ChangesetRecord>>;

    /// One page of records matching `query`, newest first, starting just
    /// past `page.after`.
    ///
    /// # Errors
    ///
    /// Storage failures.
    fn fetch_page(&self, query: &ChangesetQuery, page: PageRequest) -> Result<Vec<ChangesetRecord>>;

    /// Remove every changeset of a document, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Storage failures.
    fn delete_for_document(&self, document_id: &str) -> Result<usize>;
}
