#![allow(dead_code)]

use chronicat_core::tree::Tree;
use chronicat_engine::EngineConfig;
use rusqlite::Connection;
use serde_json::{json, Value};

pub fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().expect("in-memory database");
    chronicat_store::migrations::apply_migrations(&mut conn).expect("migrations");
    conn
}

pub fn config() -> EngineConfig {
    EngineConfig::default()
}

pub fn service(id: &str, name: &str) -> Tree {
    Tree::from(json!({
        "id": id,
        "type": "service",
        "name": name,
        "owner": "team-a",
        "description": "a service"
    }))
}

pub fn with(mut document: Tree, key: &str, value: Value) -> Tree {
    if let Some(members) = document.as_object_mut() {
        members.insert(key.to_string(), Tree::from(value));
    }
    document
}
