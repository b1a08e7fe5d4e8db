//! Shared test doubles for storage ports.

#![allow(dead_code)]

use chronicat_core::changeset::{Changeset, ChangesetRecord};
use chronicat_core::errors::{ExError, ExErrorKind, Result};
use chronicat_core::memory::MemoryStore;
use chronicat_core::ports::{ChangesetLog, DocumentSource, InsertOutcome, PageRequest};
use chronicat_core::tree::Tree;
use chronicat_core::window::ChangesetQuery;
use std::cell::{Cell, RefCell};

fn unavailable(op: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op)
        .with_message("store unavailable")
}

/// Document source whose reads always fail.
pub struct BrokenDocuments;

impl DocumentSource for BrokenDocuments {
    fn get_by_id(&self, _id: &str) -> Result<Option<Tree>> {
        Err(unavailable("get_by_id"))
    }
}

/// Change log that delegates to a memory store but fails selected reads.
pub struct FlakyLog {
    pub inner: MemoryStore,
    pub fail_last_for_document: bool,
    /// Page index (0-based) on which `fetch_page` fails, if any.
    pub fail_on_page: Option<usize>,
    pub pages_served: Cell<usize>,
    /// Changeset committed right after the first page is served.
    pub late_arrival: RefCell<Option<Changeset>>,
}

impl FlakyLog {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_last_for_document: false,
            fail_on_page: None,
            pages_served: Cell::new(0),
            late_arrival: RefCell::new(None),
        }
    }
}

impl ChangesetLog for FlakyLog {
    fn insert_if_absent(&self, changeset: &Changeset) -> Result<InsertOutcome> {
        self.inner.insert_if_absent(changeset)
    }

    fn last_for_document(&self, document_id: &str) -> Result<Option<ChangesetRecord>> {
        if self.fail_last_for_document {
            return Err(unavailable("last_for_document"));
        }
        self.inner.last_for_document(document_id)
    }

    fn fetch_page(&self, query: &ChangesetQuery, page: PageRequest) -> Result<Vec<ChangesetRecord>> {
        let index = self.pages_served.get();
        self.pages_served.set(index + 1);
        if self.fail_on_page == Some(index) {
            return Err(unavailable("fetch_page"));
        }
        let served = self.inner.fetch_page(query, page)?;
        if index == 0 {
            if let Some(changeset) = self.late_arrival.borrow_mut().take() {
                self.inner.insert_if_absent(&changeset)?;
            }
        }
        Ok(served)
    }

    fn delete_for_document(&self, document_id: &str) -> Result<usize> {
        self.inner.delete_for_document(document_id)
    }
}
