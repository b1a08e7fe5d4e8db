//! Document ingestion: upsert, read and delete.
//!
//! ## Upsert pipeline
//! 1. Mandatory field validation (no store access on failure)
//! 2. Null pruning
//! 3. Next changeset computed against the stored predecessor
//! 4. Volatile fields stamped with the changeset timestamp
//! 5. One immediate transaction: changeset insert (when non-empty), then the
//!    document upsert. An order conflict rolls back and recomputes, up to
//!    `max_insert_attempts` times.

#![allow(clippy::result_large_err)]

use crate::config::EngineConfig;
use chronicat_core::assembler::ChangesetAssembler;
use chronicat_core::changeset::{format_timestamp, ChangesetRecord};
use chronicat_core::document::{
    document_id, remove_null_members, stamp_volatile_fields, validate_mandatory_fields,
};
use chronicat_core::errors::{CatalogError, ExError, Result};
use chronicat_core::ports::{ChangesetLog, DocumentSource, InsertOutcome};
use chronicat_core::tree::Tree;
use chronicat_core::{log_op_end, log_op_error, log_op_start};
use chronicat_store::errors::from_rusqlite;
use chronicat_store::{SqliteChangesetLog, SqliteDocumentStore};
use rusqlite::{Connection, TransactionBehavior};
use std::time::Instant;

/// Result of a successful upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    pub document_id: String,
    /// True when no earlier version of the document was stored
    pub created: bool,
    /// The persisted changeset, absent when the content did not change
    pub changeset: Option<ChangesetRecord>,
}

enum Attempt {
    Done(UpsertOutcome),
    Conflict { order: i64 },
}

/// Create or update a catalog document and record what changed.
///
/// # Errors
///
/// - `MissingField` / `InvalidInput` when the document fails validation
/// - `Conflict` when every attempt collided on the changeset order
/// - `Persistence` / `Serialization` on store failures
pub fn upsert_document(
    conn: &mut Connection,
    document: Tree,
    config: &EngineConfig,
) -> Result<UpsertOutcome> {
    log_op_start!("upsert_document");
    let start = Instant::now();

    let result = upsert_document_impl(conn, document, config).map_err(|e| {
        log_op_error!(
            "upsert_document",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "upsert_document",
        duration_ms = start.elapsed().as_millis() as u64,
        document_id = result.document_id.as_str(),
        order = result.changeset.as_ref().map(|c| c.order).unwrap_or(0)
    );

    Ok(result)
}

fn upsert_document_impl(
    conn: &mut Connection,
    mut document: Tree,
    config: &EngineConfig,
) -> Result<UpsertOutcome> {
    validate_mandatory_fields(&document)
        .map_err(|e| ExError::from(e).with_op("upsert_document"))?;
    remove_null_members(&mut document);

    let id = document_id(&document)
        .ok_or_else(|| ExError::from(CatalogError::DocumentIdMissing).with_op("upsert_document"))?;

    let mut last_order = 0;
    for attempt in 1..=config.max_insert_attempts {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        match attempt_upsert(&tx, &id, &document)? {
            Attempt::Done(outcome) => {
                tx.commit().map_err(from_rusqlite)?;
                return Ok(outcome);
            }
            Attempt::Conflict { order } => {
                // dropping tx rolls back
                tracing::debug!(document_id = %id, order, attempt, "order conflict, recomputing");
                last_order = order;
            }
        }
    }

    Err(ExError::from(CatalogError::OrderConflict {
        document_id: id,
        order: last_order,
    })
    .with_op("upsert_document"))
}

fn attempt_upsert(conn: &Connection, id: &str, document: &Tree) -> Result<Attempt> {
    let documents = SqliteDocumentStore::new(conn);
    let log = SqliteChangesetLog::new(conn);

    let previous = documents.get_by_id(id)?;
    let changeset = ChangesetAssembler::new(&documents, &log).compute_next(document)?;

    let mut stored = document.clone();
    stamp_volatile_fields(
        &mut stored,
        previous.as_ref(),
        &format_timestamp(&changeset.timestamp()),
        !changeset.is_empty(),
    );

    let record = if changeset.is_empty() {
        None
    } else {
        match log.insert_if_absent(&changeset)? {
            InsertOutcome::Inserted => Some(ChangesetRecord::from(&changeset)),
            InsertOutcome::Conflict => {
                return Ok(Attempt::Conflict {
                    order: changeset.order(),
                })
            }
        }
    };

    documents.put(id, &stored, changeset.timestamp().timestamp_millis())?;

    Ok(Attempt::Done(UpsertOutcome {
        document_id: id.to_string(),
        created: previous.is_none(),
        changeset: record,
    }))
}

/// Fetch the stored version of a document.
///
/// # Errors
///
/// `NotFound` when no document has this id.
pub fn get_document(conn: &Connection, id: &str) -> Result<Tree> {
    log_op_start!("get_document", document_id = id);
    let start = Instant::now();

    let result = SqliteDocumentStore::new(conn)
        .get_by_id(id)
        .and_then(|found| {
            found.ok_or_else(|| {
                ExError::from(CatalogError::DocumentNotFound {
                    document_id: id.to_string(),
                })
                .with_op("get_document")
            })
        })
        .map_err(|e| {
            log_op_error!(
                "get_document",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "get_document",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

/// Delete a document together with all of its changesets.
///
/// Returns the number of changesets removed.
///
/// # Errors
///
/// `NotFound` when no document has this id.
pub fn delete_document(conn: &mut Connection, id: &str) -> Result<usize> {
    log_op_start!("delete_document", document_id = id);
    let start = Instant::now();

    let result = delete_document_impl(conn, id).map_err(|e| {
        log_op_error!(
            "delete_document",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "delete_document",
        duration_ms = start.elapsed().as_millis() as u64,
        result_len = result as u64
    );
    Ok(result)
}

fn delete_document_impl(conn: &mut Connection, id: &str) -> Result<usize> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;

    let documents = SqliteDocumentStore::new(&tx);
    if !documents.exists(id)? {
        return Err(ExError::from(CatalogError::DocumentNotFound {
            document_id: id.to_string(),
        })
        .with_op("delete_document"));
    }

    let removed = SqliteChangesetLog::new(&tx).delete_for_document(id)?;
    documents.delete(id)?;
    tx.commit().map_err(from_rusqlite)?;

    Ok(removed)
}
