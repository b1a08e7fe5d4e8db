//! chronicat core - change-history kernel for catalog documents
//!
//! This crate provides:
//! - The [`tree::Tree`] document model
//! - A structural diff producing JSON-Patch style operations
//! - Volatile-field exclusion and the changeset entity with its wire form
//! - `since` window translation into change-log queries
//! - Storage ports, an in-memory store, the changeset assembler and paged retrieval
//! - The error and logging facilities shared by the other crates

pub mod assembler;
pub mod changeset;
pub mod diff;
pub mod document;
pub mod errors;
pub mod filter;
pub mod logging_facility;
pub mod memory;
pub mod ports;
pub mod retrieval;
pub mod tree;
pub mod window;

// Used by the logging macros
pub use chronicat_core_types;

// Re-export commonly used types
pub use assembler::ChangesetAssembler;
pub use changeset::{Changeset, ChangesetRecord, FieldRecord};
pub use diff::{compute_diff, OpKind, OpValue, PatchOp};
pub use errors::{CatalogError, ExError, ExErrorKind, Result};
pub use filter::FieldExclusionFilter;
pub use memory::MemoryStore;
pub use ports::{ChangesetLog, DocumentSource, InsertOutcome, PageCursor, PageRequest};
pub use retrieval::collect_all;
pub use tree::Tree;
pub use window::{ChangesetQuery, SinceExpr, TimeRange};
