//! Change-history queries.
//!
//! Both queries return serialized changesets newest first, reading the change
//! log page by page with `config.page_size`.

#![allow(clippy::result_large_err)]

use crate::config::EngineConfig;
use chronicat_core::changeset::ChangesetRecord;
use chronicat_core::errors::{CatalogError, ExError, Result};
use chronicat_core::retrieval::collect_all;
use chronicat_core::window::ChangesetQuery;
use chronicat_core::{log_op_end, log_op_error, log_op_start};
use chronicat_store::{SqliteChangesetLog, SqliteDocumentStore};
use chrono::Utc;
use rusqlite::Connection;
use std::time::Instant;

/// Changesets across all documents, optionally limited by a `since` window.
///
/// # Errors
///
/// - `InvalidInput` when `since` is malformed (no store access happens)
/// - store failures while paging
pub fn list_changesets(
    conn: &Connection,
    since: Option<&str>,
    config: &EngineConfig,
) -> Result<Vec<ChangesetRecord>> {
    log_op_start!("list_changesets", since = since.unwrap_or(""));
    let start = Instant::now();

    let result = ChangesetQuery::all(since, Utc::now())
        .map_err(|e| ExError::from(e).with_op("list_changesets"))
        .and_then(|query| collect_all(&SqliteChangesetLog::new(conn), &query, config.page_size))
        .map_err(|e| {
            log_op_error!(
                "list_changesets",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "list_changesets",
        duration_ms = start.elapsed().as_millis() as u64,
        result_len = result.len() as u64
    );
    Ok(result)
}

/// Changesets of one document, optionally limited by a `since` window.
///
/// The document must exist; that is checked before `since` is validated.
///
/// # Errors
///
/// - `NotFound` when the document does not exist
/// - `InvalidInput` when `since` is malformed
/// - store failures while paging
pub fn list_document_changesets(
    conn: &Connection,
    document_id: &str,
    since: Option<&str>,
    config: &EngineConfig,
) -> Result<Vec<ChangesetRecord>> {
    log_op_start!("list_document_changesets", document_id = document_id);
    let start = Instant::now();

    let result = list_document_changesets_impl(conn, document_id, since, config).map_err(|e| {
        log_op_error!(
            "list_document_changesets",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "list_document_changesets",
        duration_ms = start.elapsed().as_millis() as u64,
        result_len = result.len() as u64
    );
    Ok(result)
}

fn list_document_changesets_impl(
    conn: &Connection,
    document_id: &str,
    since: Option<&str>,
    config: &EngineConfig,
) -> Result<Vec<ChangesetRecord>> {
    if !SqliteDocumentStore::new(conn).exists(document_id)? {
        return Err(ExError::from(CatalogError::DocumentNotFound {
            document_id: document_id.to_string(),
        })
        .with_op("list_document_changesets"));
    }

    let query = ChangesetQuery::for_document(document_id, since, Utc::now())
        .map_err(|e| ExError::from(e).with_op("list_document_changesets"))?;

    collect_all(&SqliteChangesetLog::new(conn), &query, config.page_size)
}
