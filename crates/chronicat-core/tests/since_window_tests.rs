#![allow(clippy::unwrap_used, clippy::expect_used)]

use chronicat_core::changeset::Changeset;
use chronicat_core::diff::PatchOp;
use chronicat_core::errors::CatalogError;
use chronicat_core::memory::MemoryStore;
use chronicat_core::ports::ChangesetLog;
use chronicat_core::retrieval::collect_all;
use chronicat_core::window::ChangesetQuery;
use chrono::{Duration, Utc};

fn seeded_store(document: &str, days_ago: &[i64]) -> MemoryStore {
    let store = MemoryStore::new();
    let now = Utc::now();
    for (i, days) in days_ago.iter().enumerate() {
        let cs = Changeset::with_timestamp(
            document,
            i as i64 + 1,
            vec![PatchOp::remove("/x")],
            now - Duration::days(*days),
        );
        store.insert_if_absent(&cs).unwrap();
    }
    store
}

#[test]
fn test_seven_day_window_newest_first() {
    let store = seeded_store("svc", &[8, 2, 1]);
    let query = ChangesetQuery::all(Some("7d"), Utc::now()).unwrap();

    let records = collect_all(&store, &query, 100).unwrap();

    let orders: Vec<i64> = records.iter().map(|r| r.order).collect();
    assert_eq!(orders, vec![3, 2]);
}

#[test]
fn test_three_week_window() {
    let store = seeded_store("svc", &[28, 14, 7]);
    let query = ChangesetQuery::for_document("svc", Some("3w"), Utc::now()).unwrap();

    let records = collect_all(&store, &query, 100).unwrap();

    let orders: Vec<i64> = records.iter().map(|r| r.order).collect();
    assert_eq!(orders, vec![3, 2]);
}

#[test]
fn test_absent_since_returns_everything() {
    let store = seeded_store("svc", &[400, 30, 0]);
    let query = ChangesetQuery::all(None, Utc::now()).unwrap();

    assert_eq!(collect_all(&store, &query, 100).unwrap().len(), 3);
}

#[test]
fn test_invalid_since_values_rejected() {
    for bad in ["-3d", "0w", "32", "32h", ""] {
        let result = ChangesetQuery::all(Some(bad), Utc::now());
        assert_eq!(
            result,
            Err(CatalogError::InvalidSince {
                value: bad.to_string()
            }),
            "since={:?} should be rejected",
            bad
        );
    }
}
