//! Operation boundary macros
//!
//! Every engine command logs one `start` event and exactly one of `end` or
//! `end_error`. All three carry `component` (the calling module), `op` and
//! `event`; extra `key = value` fields are passed through to `tracing`.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_boundary {
    ($level:ident, $op:expr, $event:ident, $($field:tt)*) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::chronicat_core_types::schema::$event,
            $($field)*
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use chronicat_core::log_op_start;
/// log_op_start!("upsert_document");
/// log_op_start!("get_document", document_id = "svc-1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_boundary!(info, $op, EVENT_START, $($($field)*)?)
    };
}

/// Log the successful end of an operation; `duration_ms` is required
///
/// ```
/// # use chronicat_core::log_op_end;
/// log_op_end!("list_changesets", duration_ms = 3, result_len = 12u64);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_boundary!(
            info,
            $op,
            EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log a failed operation at error level with the error's kind and code
///
/// `$err` is anything convertible into [`ExError`](crate::errors::ExError).
///
/// ```
/// # use chronicat_core::{log_op_error, errors::CatalogError};
/// let err = CatalogError::DocumentNotFound { document_id: "svc-1".to_string() };
/// log_op_error!("get_document", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_boundary!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($($field)*)?
        )
    }};
}
