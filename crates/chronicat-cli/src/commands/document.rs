//! Document commands
//!
//! Usage: chronicat document put <FILE> | get <ID> | delete <ID>

use super::{open_store, print_json};
use chronicat_core::errors::{ExError, ExErrorKind, Result};
use chronicat_core::tree::Tree;
use chronicat_engine::commands::ingest::{delete_document, get_document, upsert_document};
use chronicat_engine::EngineConfig;
use clap::{Args, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct DocumentArgs {
    #[command(subcommand)]
    pub command: DocumentCommand,
}

#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// Create or update a document from a YAML or JSON file
    Put(PutArgs),
    /// Print the stored version of a document
    Get(IdArgs),
    /// Delete a document and its change history
    Delete(IdArgs),
}

#[derive(Debug, Args)]
pub struct PutArgs {
    /// File holding exactly one document
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    /// Document id
    pub id: String,
}

/// Execute document command
pub fn execute(args: DocumentArgs, config: &EngineConfig) -> Result<()> {
    match args.command {
        DocumentCommand::Put(put_args) => execute_put(put_args, config),
        DocumentCommand::Get(id_args) => {
            let conn = open_store(config)?;
            print_json(&get_document(&conn, &id_args.id)?)
        }
        DocumentCommand::Delete(id_args) => {
            let mut conn = open_store(config)?;
            let removed = delete_document(&mut conn, &id_args.id)?;
            print_json(&json!({
                "document": id_args.id,
                "deleted": true,
                "changesets_removed": removed,
            }))
        }
    }
}

fn execute_put(args: PutArgs, config: &EngineConfig) -> Result<()> {
    let document = read_document_file(&args.file)?;
    let mut conn = open_store(config)?;
    let outcome = upsert_document(&mut conn, document, config)?;

    print_json(&json!({
        "document": outcome.document_id,
        "created": outcome.created,
        "changeset": outcome.changeset,
    }))
}

/// Read one document; YAML parsing also accepts JSON.
fn read_document_file(path: &Path) -> Result<Tree> {
    let bad_file = |message: String| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("read_document_file")
            .with_entity_id(path.display().to_string())
            .with_message(message)
    };

    let text = std::fs::read_to_string(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("read_document_file")
            .with_entity_id(path.display().to_string())
            .with_message(e.to_string())
    })?;
    let value: serde_json::Value =
        serde_yaml::from_str(&text).map_err(|e| bad_file(format!("parse error: {}", e)))?;

    if !value.is_object() {
        return Err(bad_file("document file must hold a single mapping".to_string()));
    }
    Ok(Tree::from(value))
}
