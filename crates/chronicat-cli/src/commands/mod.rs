pub mod changeset;
pub mod document;
pub mod import;

use chronicat_core::errors::{ExError, ExErrorKind, Result};
use chronicat_engine::EngineConfig;
use rusqlite::Connection;
use serde::Serialize;

/// Open the configured database, creating and migrating it when needed
pub(crate) fn open_store(config: &EngineConfig) -> Result<Connection> {
    chronicat_store::db::open_ready(&config.db_path)
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("print_json")
            .with_message(e.to_string())
    })?;
    println!("{}", text);
    Ok(())
}
