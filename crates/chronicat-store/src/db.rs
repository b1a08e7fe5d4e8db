//! Opening the catalog database

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;
use rusqlite::Connection;
use std::path::Path;

/// Open `path` (creating the file if needed) with foreign keys enforced,
/// WAL journaling and every migration applied.
pub fn open_ready<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let mut conn = Connection::open(path).map_err(from_rusqlite)?;

    conn.pragma_update(None, "foreign_keys", true)
        .map_err(from_rusqlite)?;
    // journal_mode answers with the resulting mode
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "wal", |row| row.get(0))
        .map_err(from_rusqlite)?;
    if mode != "wal" {
        tracing::debug!(mode = %mode, "WAL unavailable, keeping journal mode");
    }

    apply_migrations(&mut conn)?;
    Ok(conn)
}
