//! chronicat engine - orchestration layer
//!
//! Coordinates the core change-history logic with the SQLite stores:
//! document ingestion, history queries, bulk import and configuration.

pub mod commands;
pub mod config;

pub use config::EngineConfig;
