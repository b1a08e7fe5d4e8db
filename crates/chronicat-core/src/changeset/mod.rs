//! Changeset entity and its wire form.

pub mod model;
pub mod serializer;

pub use model::Changeset;
pub use serializer::{format_timestamp, parse_timestamp, wire_value, ChangesetRecord, FieldRecord};
