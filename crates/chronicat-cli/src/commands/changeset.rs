//! Changeset commands
//!
//! Usage: chronicat changeset list [--document <ID>] [--since <EXPR>]

use super::{open_store, print_json};
use chronicat_core::errors::Result;
use chronicat_engine::commands::history::{list_changesets, list_document_changesets};
use chronicat_engine::EngineConfig;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ChangesetArgs {
    #[command(subcommand)]
    pub command: ChangesetCommand,
}

#[derive(Debug, Subcommand)]
pub enum ChangesetCommand {
    /// List changesets, newest first, as a JSON array
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only changesets of this document
    #[arg(long)]
    pub document: Option<String>,

    /// Window such as `7d` or `2w`, counted from midnight UTC
    #[arg(long)]
    pub since: Option<String>,
}

/// Execute changeset command
pub fn execute(args: ChangesetArgs, config: &EngineConfig) -> Result<()> {
    match args.command {
        ChangesetCommand::List(list_args) => execute_list(list_args, config),
    }
}

fn execute_list(args: ListArgs, config: &EngineConfig) -> Result<()> {
    let conn = open_store(config)?;
    let since = args.since.as_deref();

    let records = match args.document.as_deref() {
        Some(id) => list_document_changesets(&conn, id, since, config)?,
        None => list_changesets(&conn, since, config)?,
    };
    print_json(&records)
}
