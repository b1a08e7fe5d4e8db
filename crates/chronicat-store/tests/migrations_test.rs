// Integration tests for the migration framework

use rusqlite::Connection;

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = Connection::open_in_memory().expect("in-memory database");

    let result = chronicat_store::migrations::apply_migrations(&mut conn);

    assert!(result.is_ok(), "Migrations should succeed: {:?}", result.err());
    assert_eq!(
        table_names(&conn),
        vec!["changesets", "documents", "schema_version"]
    );
}

#[test]
fn test_applied_migrations_recorded_in_order() {
    let mut conn = Connection::open_in_memory().unwrap();
    chronicat_store::migrations::apply_migrations(&mut conn).unwrap();

    let applied = chronicat_store::migrations::applied_migrations(&conn).unwrap();

    assert_eq!(applied, vec!["001_documents", "002_changesets"]);
}

#[test]
fn test_migrations_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    {
        let conn = chronicat_store::db::open_ready(&path).unwrap();
        conn.execute(
            "INSERT INTO documents (id, body, updated_at) VALUES ('a', '{}', 0)",
            [],
        )
        .unwrap();
    }

    let conn = chronicat_store::db::open_ready(&path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(
        chronicat_store::migrations::applied_migrations(&conn).unwrap().len(),
        2
    );
}

#[test]
fn test_unique_document_order_enforced_by_schema() {
    let mut conn = Connection::open_in_memory().unwrap();
    chronicat_store::migrations::apply_migrations(&mut conn).unwrap();

    let insert = "INSERT INTO changesets (document, ord, timestamp_ms, timestamp, fields)
                  VALUES ('a', 1, 0, '1970-01-01T00:00:00.000Z', '[]')";
    conn.execute(insert, []).unwrap();
    let err = conn.execute(insert, []).unwrap_err();

    assert!(chronicat_store::errors::is_unique_violation(&err));
}
