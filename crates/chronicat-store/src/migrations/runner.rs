//! Brings a database up to the embedded schema.
//!
//! Every recorded checksum is verified before anything runs, so an edited
//! migration stops the run with the database untouched. Pending migrations
//! are then applied one transaction each.

#![allow(clippy::result_large_err)]

use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::{Migration, MIGRATIONS};
use rusqlite::{params, Connection};
use std::collections::HashMap;

const LEDGER_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    migration_id TEXT NOT NULL UNIQUE,
    applied_at INTEGER NOT NULL,
    checksum TEXT
)";

pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(LEDGER_DDL).map_err(from_rusqlite)?;

    let recorded = recorded_checksums(conn)?;
    let mut pending = Vec::new();
    for migration in MIGRATIONS {
        let embedded = compute_checksum(migration.sql);
        match recorded.get(migration.id) {
            None => pending.push((migration, embedded)),
            // rows written without a checksum are trusted as-is
            Some(None) => {}
            Some(Some(stored)) if *stored == embedded => {}
            Some(Some(stored)) => return Err(checksum_mismatch(migration.id, stored, &embedded)),
        }
    }

    for (migration, checksum) in pending {
        run_one(conn, migration, &checksum)?;
    }
    Ok(())
}

/// Ids of applied migrations, oldest first
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT migration_id FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(from_rusqlite)?;
    rows.map(|r| r.map_err(from_rusqlite)).collect()
}

fn recorded_checksums(conn: &Connection) -> Result<HashMap<String, Option<String>>> {
    let mut stmt = conn
        .prepare("SELECT migration_id, checksum FROM schema_version")
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })
        .map_err(from_rusqlite)?;
    rows.map(|r| r.map_err(from_rusqlite)).collect()
}

fn run_one(conn: &mut Connection, migration: &Migration, checksum: &str) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute_batch(migration.sql)
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        params![migration.id, chrono::Utc::now().timestamp(), checksum],
    )
    .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(migration_id = migration.id, "applied migration");
    Ok(())
}
