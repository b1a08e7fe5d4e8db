//! Command orchestration layer.
//!
//! Each public command owns its logging boundary:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!` and `tracing::warn!`.

pub mod history;
pub mod import;
pub mod ingest;
