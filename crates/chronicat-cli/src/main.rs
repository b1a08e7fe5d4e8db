//! chronicat CLI - command-line interface for the catalog change history
//!
//! Exit codes follow the error's client status: 400 → 2, 404 → 3, 409 → 4,
//! anything else → 1. Each invocation runs under a fresh request id, which
//! is recorded on its tracing span and appended to any reported error.

#![allow(clippy::result_large_err)]

use chronicat_core::chronicat_core_types::RequestId;
use chronicat_core::errors::{ExError, Result};
use chronicat_core::logging_facility;
use chronicat_engine::EngineConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "chronicat")]
#[command(about = "Catalog document store with field-level change history", long_about = None)]
struct Cli {
    /// SQLite database file (overrides config and CHRONICAT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store, read or delete catalog documents
    Document(commands::document::DocumentArgs),

    /// Read the change history
    Changeset(commands::changeset::ChangesetArgs),

    /// Import documents from a YAML/JSON file or a directory of them
    Import(commands::import::ImportArgs),
}

fn exit_code(err: &ExError) -> i32 {
    match err.kind().client_status() {
        400 => 2,
        404 => 3,
        409 => 4,
        _ => 1,
    }
}

fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let config = EngineConfig::load(cli.config.as_deref())?;
    Ok(match &cli.db {
        Some(path) => config.with_db_path(path),
        None => config,
    })
}

fn run(cli: Cli, request_id: RequestId) -> Result<()> {
    let config = resolve_config(&cli)?;
    logging_facility::init(config.log_profile);
    let span = tracing::info_span!("invocation", request_id = %request_id);
    let _entered = span.enter();

    match cli.command {
        Commands::Document(args) => commands::document::execute(args, &config),
        Commands::Changeset(args) => commands::changeset::execute(args, &config),
        Commands::Import(args) => commands::import::execute(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();
    let request_id = RequestId::new();

    if let Err(e) = run(cli, request_id) {
        let e = e.with_request_id(request_id);
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicat_core::errors::ExErrorKind;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&ExError::new(ExErrorKind::InvalidInput)), 2);
        assert_eq!(exit_code(&ExError::new(ExErrorKind::MissingField)), 2);
        assert_eq!(exit_code(&ExError::new(ExErrorKind::NotFound)), 3);
        assert_eq!(exit_code(&ExError::new(ExErrorKind::Conflict)), 4);
        assert_eq!(exit_code(&ExError::new(ExErrorKind::Persistence)), 1);
    }

    #[test]
    fn test_db_flag_overrides_config() {
        let cli = Cli::parse_from(["chronicat", "--db", "/tmp/x.db", "changeset", "list"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
    }
}
