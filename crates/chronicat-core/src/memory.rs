//! In-memory store.
//!
//! HashMap-backed implementation of both storage ports. Used by tests and by
//! callers that want the assembler without a database.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::changeset::{Changeset, ChangesetRecord};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::ports::{ChangesetLog, DocumentSource, InsertOutcome, PageCursor, PageRequest};
use crate::tree::Tree;
use crate::window::ChangesetQuery;

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Tree>>,
    changesets: Mutex<Vec<ChangesetRecord>>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, op: &str) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| {
        ExError::new(ExErrorKind::Internal)
            .with_op(op)
            .with_message("memory store lock poisoned")
    })
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or overwrite) the current version of a document.
    ///
    /// # Errors
    ///
    /// Fails only if the store's lock is poisoned.
    pub fn put_document(&self, id: impl Into<String>, document: Tree) -> Result<()> {
        lock(&self.documents, "put_document")?.insert(id.into(), document);
        Ok(())
    }

    /// Number of stored changesets across all documents.
    ///
    /// # Errors
    ///
    /// Fails only if the store's lock is poisoned.
    pub fn changeset_count(&self) -> Result<usize> {
        Ok(lock(&self.changesets, "changeset_count")?.len())
    }
}

impl DocumentSource for MemoryStore {
    fn get_by_id(&self, id: &str) -> Result<Option<Tree>> {
        Ok(lock(&self.documents, "get_by_id")?.get(id).cloned())
    }
}

impl ChangesetLog for MemoryStore {
    fn insert_if_absent(&self, changeset: &Changeset) -> Result<InsertOutcome> {
        let mut records = lock(&self.changesets, "insert_if_absent")?;
        let taken = records
            .iter()
            .any(|r| r.document == changeset.document() && r.order == changeset.order());
        if taken {
            return Ok(InsertOutcome::Conflict);
        }
        records.push(ChangesetRecord::from(changeset));
        Ok(InsertOutcome::Inserted)
    }

    fn last_for_document(&self, document_id: &str) -> Result<Option<ChangesetRecord>> {
        Ok(lock(&self.changesets, "last_for_document")?
            .iter()
            .filter(|r| r.document == document_id)
            .max_by_key(|r| r.order)
            .cloned())
    }

    fn fetch_page(&self, query: &ChangesetQuery, page: PageRequest) -> Result<Vec<ChangesetRecord>> {
        let records = lock(&self.changesets, "fetch_page")?;
        let mut matching: Vec<(PageCursor, &ChangesetRecord)> = records
            .iter()
            .filter(|r| query.matches(r))
            .map(|r| (PageCursor::of(r), r))
            .filter(|(pos, _)| page.after.as_ref().map_or(true, |after| pos > after))
            .collect();
        matching.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(matching
            .into_iter()
            .take(page.size)
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn delete_for_document(&self, document_id: &str) -> Result<usize> {
        let mut records = lock(&self.changesets, "delete_for_document")?;
        let before = records.len();
        records.retain(|r| r.document != document_id);
        Ok(before - records.len())
    }
}
