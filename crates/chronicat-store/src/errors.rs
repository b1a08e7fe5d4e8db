//! Store-side constructors for [`ExError`]
//!
//! SQLite failures become `Persistence`, undecodable rows `Serialization`,
//! unreadable import files `Io` and malformed ones `InvalidInput`.

use chronicat_core::errors::{ExError, ExErrorKind};
use rusqlite::ffi;

pub type Result<T> = std::result::Result<T, ExError>;

pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// UNIQUE or PRIMARY KEY violation; other constraint failures do not count
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => matches!(
            e.extended_code,
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        ),
        _ => false,
    }
}

/// A stored row whose body or fields no longer decode. `key` names the row.
pub fn corrupt_row(table: &str, key: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("decode_row")
        .with_entity_id(key)
        .with_message(format!("{} row does not decode: {}", table, reason))
}

pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_entity_id(migration_id)
        .with_message(reason.to_string())
}

/// An applied migration whose embedded SQL has since been edited
pub fn checksum_mismatch(migration_id: &str, recorded: &str, embedded: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_entity_id(migration_id)
        .with_message(format!(
            "recorded checksum {} differs from embedded {}",
            recorded, embedded
        ))
}

pub fn import_invalid(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("import_parse")
        .with_message(reason.to_string())
}

pub fn io_error(op: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(op)
        .with_message(err.to_string())
}
