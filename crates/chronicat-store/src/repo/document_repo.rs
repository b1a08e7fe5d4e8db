//! Document store backed by the `documents` table

#![allow(clippy::result_large_err)]

use crate::errors::{corrupt_row, from_rusqlite, Result};
use chronicat_core::errors::ExError;
use chronicat_core::ports::DocumentSource;
use chronicat_core::tree::Tree;
use rusqlite::{Connection, OptionalExtension};

/// Current version of each catalog document, stored as JSON text.
///
/// Borrows a connection, so it can equally run over a `Transaction`.
pub struct SqliteDocumentStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteDocumentStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert or overwrite a document
    pub fn put(&self, id: &str, document: &Tree, updated_at_ms: i64) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO documents (id, body, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                    body = excluded.body,
                    updated_at = excluded.updated_at",
                rusqlite::params![id, document.canonical_text(), updated_at_ms],
            )
            .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Delete a document, returning whether a row was removed
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;
        Ok(removed > 0)
    }

    pub fn exists(&self, id: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM documents WHERE id = ?1", [id], |_| Ok(()))
            .optional()
            .map_err(from_rusqlite)?;
        Ok(found.is_some())
    }

    /// Ids of all stored documents, sorted
    pub fn list_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM documents ORDER BY id")
            .map_err(from_rusqlite)?;
        let ids = stmt
            .query_map([], |row| row.get(0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(from_rusqlite)?;
        Ok(ids)
    }
}

impl DocumentSource for SqliteDocumentStore<'_> {
    fn get_by_id(&self, id: &str) -> std::result::Result<Option<Tree>, ExError> {
        let body: Option<String> = self
            .conn
            .query_row("SELECT body FROM documents WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(from_rusqlite)?;

        body.map(|text| {
            serde_json::from_str::<serde_json::Value>(&text)
                .map(Tree::from)
                .map_err(|e| corrupt_row("documents", id, &e.to_string()))
        })
        .transpose()
    }
}
