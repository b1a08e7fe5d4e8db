//! Field keys and event names used in structured log events
//!
//! The boundary macros in `chronicat-core` write `component`, `op` and
//! `event`. Commands add the entity and size keys below as extra fields.

// Boundary keys
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entities
pub const FIELD_DOCUMENT_ID: &str = "document_id";
pub const FIELD_ORDER: &str = "order";
pub const FIELD_SINCE: &str = "since";
pub const FIELD_SOURCE: &str = "source";

// Sizes
pub const FIELD_OPS_LEN: &str = "ops_len";
pub const FIELD_RESULT_LEN: &str = "result_len";
pub const FIELD_PAGE_SIZE: &str = "page_size";

// Errors
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
