//! Migration scripts compiled into the binary, in application order

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "001_documents",
        sql: include_str!("../../migrations/001_documents.sql"),
    },
    Migration {
        id: "002_changesets",
        sql: include_str!("../../migrations/002_changesets.sql"),
    },
];
