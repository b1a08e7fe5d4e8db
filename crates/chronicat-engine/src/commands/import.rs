//! Bulk document import.
//!
//! Each document of each file is upserted in order through the regular
//! ingestion pipeline. The first failure stops the import; documents already
//! upserted stay committed.

#![allow(clippy::result_large_err)]

use crate::commands::ingest::upsert_document;
use crate::config::EngineConfig;
use chronicat_core::errors::Result;
use chronicat_core::{log_op_end, log_op_error, log_op_start};
use chronicat_store::import::{collect_import_paths, parse_import_file};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Outcome for one imported document
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedDocument {
    pub source: PathBuf,
    pub document_id: String,
    pub created: bool,
    /// Order of the changeset written, if the content changed
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub documents: Vec<ImportedDocument>,
}

impl ImportSummary {
    /// Number of documents whose import wrote a changeset
    pub fn changed(&self) -> usize {
        self.documents.iter().filter(|d| d.order.is_some()).count()
    }
}

/// Import a file or every catalog file of a directory.
///
/// # Errors
///
/// The first parse or ingestion error, tagged with the offending file.
pub fn import_path(conn: &mut Connection, path: &Path, config: &EngineConfig) -> Result<ImportSummary> {
    let source = path.display().to_string();
    log_op_start!("import_path", source = source.as_str());
    let start = Instant::now();

    let result = import_path_impl(conn, path, config).map_err(|e| {
        log_op_error!(
            "import_path",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "import_path",
        duration_ms = start.elapsed().as_millis() as u64,
        result_len = result.documents.len() as u64
    );
    Ok(result)
}

fn import_path_impl(conn: &mut Connection, path: &Path, config: &EngineConfig) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for file in collect_import_paths(path)? {
        let parsed = parse_import_file(&file)?;
        for document in parsed.documents {
            let outcome = upsert_document(conn, document, config)
                .map_err(|e| e.with_entity_id(file.display().to_string()))?;
            summary.documents.push(ImportedDocument {
                source: file.clone(),
                document_id: outcome.document_id,
                created: outcome.created,
                order: outcome.changeset.map(|c| c.order),
            });
        }
    }

    Ok(summary)
}
