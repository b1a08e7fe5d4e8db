//! Structural document diff.
//!
//! Compares the previously stored version of a document with the incoming one
//! and produces an ordered list of JSON-Patch style operations.
//!
//! ## Entry point
//!
//! ```
//! use chronicat_core::diff::compute_diff;
//! use chronicat_core::tree::Tree;
//! use serde_json::json;
//!
//! let before = Tree::from(json!({"name": "Micro"}));
//! let after = Tree::from(json!({"name": "Macro"}));
//! let ops = compute_diff(Some(&before), &after);
//! assert_eq!(ops.len(), 1);
//! assert_eq!(ops[0].path, "/name");
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical operation sequences.
//! - **Positional arrays**: array elements are addressed by index; removals are
//!   emitted at the index the element occupies after preceding operations.
//! - Operation order is stable but callers should key assertions by path.

pub mod engine;
pub mod model;
pub mod pointer;

pub use engine::compute_diff;
pub use model::{OpKind, OpValue, PatchOp};
