//! Import command
//!
//! Usage: chronicat import <PATH>

use super::{open_store, print_json};
use chronicat_core::errors::Result;
use chronicat_engine::commands::import::import_path;
use chronicat_engine::EngineConfig;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// YAML/JSON file, or a directory of them
    pub path: PathBuf,
}

/// Execute import command
pub fn execute(args: ImportArgs, config: &EngineConfig) -> Result<()> {
    let mut conn = open_store(config)?;
    let summary = import_path(&mut conn, &args.path, config)?;

    let documents: Vec<_> = summary
        .documents
        .iter()
        .map(|d| {
            json!({
                "source": d.source.display().to_string(),
                "document": d.document_id,
                "created": d.created,
                "order": d.order,
            })
        })
        .collect();

    print_json(&json!({
        "imported": summary.documents.len(),
        "changed": summary.changed(),
        "documents": documents,
    }))
}
