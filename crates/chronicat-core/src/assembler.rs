//! Changeset assembly.
//!
//! [`ChangesetAssembler::compute_next`] derives the next changeset for an
//! incoming document: it loads the stored predecessor, diffs, filters volatile
//! fields, and numbers the result one past the document's latest order.

use crate::changeset::Changeset;
use crate::diff::compute_diff;
use crate::document::FIELD_ID;
use crate::errors::{ExError, ExErrorKind, Result};
use crate::filter::FieldExclusionFilter;
use crate::ports::{ChangesetLog, DocumentSource};
use crate::tree::Tree;

pub struct ChangesetAssembler<'a> {
    documents: &'a dyn DocumentSource,
    log: &'a dyn ChangesetLog,
    filter: FieldExclusionFilter,
}

impl<'a> ChangesetAssembler<'a> {
    pub fn new(documents: &'a dyn DocumentSource, log: &'a dyn ChangesetLog) -> Self {
        Self {
            documents,
            log,
            filter: FieldExclusionFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: FieldExclusionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Compute the changeset an incoming document would produce.
    ///
    /// The result may be empty; the caller decides whether to persist it.
    /// Nothing is written here.
    ///
    /// # Errors
    ///
    /// - `MissingField` if the document has no `id` member
    /// - any error from the document source while loading the predecessor
    ///
    /// A failure to read the latest order is not an error: it is logged and
    /// the order restarts at 1.
    pub fn compute_next(&self, incoming: &Tree) -> Result<Changeset> {
        let document_id = incoming
            .get(FIELD_ID)
            .map(Tree::as_text)
            .ok_or_else(|| {
                ExError::new(ExErrorKind::MissingField)
                    .with_op("compute_next")
                    .with_message("incoming document has no id")
            })?;

        let previous = self.documents.get_by_id(&document_id).map_err(|e| {
            ExError::new(e.kind())
                .with_op("compute_next")
                .with_entity_id(document_id.as_str())
                .with_message("failed to load predecessor document")
                .with_source(e)
        })?;

        let ops = compute_diff(previous.as_ref(), incoming);
        let fields = self.filter.apply(ops);
        let order = self.last_order(&document_id) + 1;

        tracing::debug!(
            document_id = %document_id,
            order,
            ops_len = fields.len(),
            "computed next changeset"
        );

        Ok(Changeset::new(document_id, order, fields))
    }

    /// Highest stored order for a document, or 0 when none can be read.
    pub fn last_order(&self, document_id: &str) -> i64 {
        match self.log.last_for_document(document_id) {
            Ok(Some(record)) => record.order,
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(
                    document_id = %document_id,
                    err_code = e.code(),
                    "could not read latest changeset order, restarting at 1: {}",
                    e
                );
                0
            }
        }
    }
}
