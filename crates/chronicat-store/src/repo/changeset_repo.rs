//! Change log backed by the `changesets` table
//!
//! Each row holds the serialized wire record of one changeset. Uniqueness of
//! `(document, ord)` is enforced by the table, and a violation is reported as
//! [`InsertOutcome::Conflict`] so the caller can recompute and retry.

#![allow(clippy::result_large_err)]

use crate::errors::{corrupt_row, from_rusqlite, is_unique_violation, Result};
use chronicat_core::changeset::{
    format_timestamp, parse_timestamp, Changeset, ChangesetRecord, FieldRecord,
};
use chronicat_core::ports::{ChangesetLog, InsertOutcome, PageRequest};
use chronicat_core::window::ChangesetQuery;
use rusqlite::{Connection, OptionalExtension, Row};

const SELECT_COLUMNS: &str = "SELECT document, ord, timestamp, fields FROM changesets";

pub struct SqliteChangesetLog<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteChangesetLog<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Number of changesets stored for a document
    pub fn count_for_document(&self, document_id: &str) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM changesets WHERE document = ?1",
                [document_id],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)
    }
}

struct RawRow {
    document: String,
    order: i64,
    timestamp: String,
    fields: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        document: row.get(0)?,
        order: row.get(1)?,
        timestamp: row.get(2)?,
        fields: row.get(3)?,
    })
}

fn decode(raw: RawRow) -> Result<ChangesetRecord> {
    let key = format!("{}#{}", raw.document, raw.order);
    let timestamp = parse_timestamp(&raw.timestamp)
        .map_err(|e| corrupt_row("changesets", &key, &e.to_string()))?;
    let fields: Vec<FieldRecord> = serde_json::from_str(&raw.fields)
        .map_err(|e| corrupt_row("changesets", &key, &e.to_string()))?;
    Ok(ChangesetRecord {
        document: raw.document,
        order: raw.order,
        timestamp,
        fields,
    })
}

impl ChangesetLog for SqliteChangesetLog<'_> {
    fn insert_if_absent(&self, changeset: &Changeset) -> Result<InsertOutcome> {
        let record = ChangesetRecord::from(changeset);
        let fields = serde_json::to_string(&record.fields)
            .map_err(|e| corrupt_row("changesets", &record.document, &e.to_string()))?;

        let inserted = self.conn.execute(
            "INSERT INTO changesets (document, ord, timestamp_ms, timestamp, fields)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                record.document,
                record.order,
                record.timestamp.timestamp_millis(),
                format_timestamp(&record.timestamp),
                fields,
            ],
        );

        match inserted {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(
                    document_id = %record.document,
                    order = record.order,
                    "changeset order already taken"
                );
                Ok(InsertOutcome::Conflict)
            }
            Err(e) => Err(from_rusqlite(e)),
        }
    }

    fn last_for_document(&self, document_id: &str) -> Result<Option<ChangesetRecord>> {
        let sql = format!("{} WHERE document = ?1 ORDER BY ord DESC LIMIT 1", SELECT_COLUMNS);
        let raw = self
            .conn
            .query_row(&sql, [document_id], read_row)
            .optional()
            .map_err(from_rusqlite)?;
        raw.map(decode).transpose()
    }

    fn fetch_page(&self, query: &ChangesetQuery, page: PageRequest) -> Result<Vec<ChangesetRecord>> {
        // ?5..?7 hold the cursor; the predicate mirrors the ORDER BY
        let sql = format!(
            "{} WHERE (?1 IS NULL OR document = ?1)
               AND (?2 IS NULL OR timestamp_ms >= ?2)
               AND (?3 IS NULL OR timestamp_ms <= ?3)
               AND (?5 IS NULL
                    OR timestamp_ms < ?5
                    OR (timestamp_ms = ?5 AND document > ?6)
                    OR (timestamp_ms = ?5 AND document = ?6 AND ord < ?7))
             ORDER BY timestamp_ms DESC, document ASC, ord DESC
             LIMIT ?4",
            SELECT_COLUMNS
        );
        let from_ms = query.range.map(|r| r.from.timestamp_millis());
        let to_ms = query.range.map(|r| r.to.timestamp_millis());
        let limit = i64::try_from(page.size).unwrap_or(i64::MAX);
        let after = page.after.as_ref();

        let mut stmt = self.conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(
                rusqlite::params![
                    query.document,
                    from_ms,
                    to_ms,
                    limit,
                    after.map(|c| c.timestamp_ms),
                    after.map(|c| c.document.as_str()),
                    after.map(|c| c.order),
                ],
                read_row,
            )
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        rows.into_iter().map(decode).collect()
    }

    fn delete_for_document(&self, document_id: &str) -> Result<usize> {
        self.conn
            .execute("DELETE FROM changesets WHERE document = ?1", [document_id])
            .map_err(from_rusqlite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use chronicat_core::diff::PatchOp;
    use chronicat_core::ports::PageCursor;
    use chronicat_core::tree::Tree;
    use chrono::{Duration, Utc};

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_duplicate_order_is_conflict() {
        let conn = setup();
        let log = SqliteChangesetLog::new(&conn);
        let cs = Changeset::new("a", 1, vec![PatchOp::remove("/x")]);
        assert_eq!(log.insert_if_absent(&cs).unwrap(), InsertOutcome::Inserted);
        assert_eq!(log.insert_if_absent(&cs).unwrap(), InsertOutcome::Conflict);
        assert_eq!(log.count_for_document("a").unwrap(), 1);
    }

    #[test]
    fn test_round_trip_preserves_wire_form() {
        let conn = setup();
        let log = SqliteChangesetLog::new(&conn);
        let cs = Changeset::new(
            "a",
            1,
            vec![
                PatchOp::replace("/name", &Tree::from("say \"hi\"")),
                PatchOp::remove("/owner"),
            ],
        );
        log.insert_if_absent(&cs).unwrap();

        let stored = log.last_for_document("a").unwrap().unwrap();
        assert_eq!(stored, ChangesetRecord::from(&cs));
    }

    #[test]
    fn test_last_for_document_is_highest_order() {
        let conn = setup();
        let log = SqliteChangesetLog::new(&conn);
        for order in [1, 3, 2] {
            log.insert_if_absent(&Changeset::new("a", order, vec![])).unwrap();
        }
        assert_eq!(log.last_for_document("a").unwrap().unwrap().order, 3);
        assert!(log.last_for_document("b").unwrap().is_none());
    }

    #[test]
    fn test_fetch_page_sorted_newest_first() {
        let conn = setup();
        let log = SqliteChangesetLog::new(&conn);
        let now = Utc::now();
        for (order, hours) in [(1, 3), (2, 2), (3, 1)] {
            let cs = Changeset::with_timestamp("a", order, vec![], now - Duration::hours(hours));
            log.insert_if_absent(&cs).unwrap();
        }
        let query = ChangesetQuery::default();

        let first = log.fetch_page(&query, PageRequest::first(2)).unwrap();
        let next = PageRequest::after(PageCursor::of(first.last().unwrap()), 2);
        let second = log.fetch_page(&query, next).unwrap();
        let next = PageRequest::after(PageCursor::of(second.last().unwrap()), 2);
        let third = log.fetch_page(&query, next).unwrap();

        assert_eq!(first.iter().map(|r| r.order).collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(second.iter().map(|r| r.order).collect::<Vec<_>>(), vec![1]);
        assert!(third.is_empty());
    }

    #[test]
    fn test_cursor_breaks_timestamp_ties_by_document_then_order() {
        let conn = setup();
        let log = SqliteChangesetLog::new(&conn);
        let ts = Utc::now();
        for (doc, order) in [("b", 1), ("a", 1), ("a", 2), ("c", 1)] {
            log.insert_if_absent(&Changeset::with_timestamp(doc, order, vec![], ts))
                .unwrap();
        }
        let query = ChangesetQuery::default();

        let first = log.fetch_page(&query, PageRequest::first(2)).unwrap();
        let next = PageRequest::after(PageCursor::of(first.last().unwrap()), 10);
        let rest = log.fetch_page(&query, next).unwrap();

        let keys = |page: &[ChangesetRecord]| {
            page.iter()
                .map(|r| (r.document.clone(), r.order))
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(&first), vec![("a".to_string(), 2), ("a".to_string(), 1)]);
        assert_eq!(keys(&rest), vec![("b".to_string(), 1), ("c".to_string(), 1)]);
    }

    #[test]
    fn test_corrupt_fields_column_is_an_error() {
        let conn = setup();
        conn.execute(
            "INSERT INTO changesets (document, ord, timestamp_ms, timestamp, fields)
             VALUES ('a', 1, 0, '1970-01-01T00:00:00.000Z', 'oops')",
            [],
        )
        .unwrap();
        let err = SqliteChangesetLog::new(&conn)
            .last_for_document("a")
            .unwrap_err();
        assert_eq!(err.entity_id(), Some("a#1"));
    }
}
