//! Types shared by the chronicat error and logging facilities
//!
//! - [`correlation::RequestId`]: per-invocation correlation id
//! - [`schema`]: canonical log field keys and boundary event names

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
