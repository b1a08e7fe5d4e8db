//! Error facility
//!
//! [`ExError`] is the one error type crossing crate boundaries. It pairs a
//! stable [`ExErrorKind`] with optional context (operation, entity, request)
//! and an optional wrapped cause. Domain failures are raised as
//! [`CatalogError`] and converted at the boundary.

use chronicat_core_types::RequestId;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExError>;

/// Error classification with a stable `ERR_*` code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    InvalidInput,
    /// A mandatory document field is absent or empty
    MissingField,
    NotFound,
    /// Insert collided on `(document, order)`; caller may recompute and retry
    Conflict,
    Io,
    Serialization,
    Persistence,
    Internal,
}

impl ExErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// HTTP-style status a client-facing surface should report for this kind.
    pub fn client_status(&self) -> u16 {
        match self {
            ExErrorKind::InvalidInput | ExErrorKind::MissingField => 400,
            ExErrorKind::NotFound => 404,
            ExErrorKind::Conflict => 409,
            _ => 500,
        }
    }

    /// True for kinds caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        self.client_status() < 500
    }
}

#[derive(Debug, Clone, Default)]
struct Context {
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
}

/// Structured error built fluently:
///
/// ```
/// use chronicat_core::errors::{ExError, ExErrorKind};
///
/// let err = ExError::new(ExErrorKind::NotFound)
///     .with_op("get_document")
///     .with_entity_id("svc-1")
///     .with_message("no such document");
/// assert_eq!(err.to_string(), "ERR_NOT_FOUND: no such document (op: get_document, entity: svc-1)");
/// ```
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    message: String,
    context: Context,
    source: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            message: String::new(),
            context: Context::default(),
            source: None,
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.context.op = Some(op.into());
        self
    }

    /// Usually a document id; import errors use the file path instead
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.context.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.context.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Wrap the error that caused this one
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.context.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.context.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.context.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// `CODE: message (op: .., entity: .., request: ..); caused by ..`
impl fmt::Display for ExError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }

        let mut context = Vec::new();
        if let Some(op) = &self.context.op {
            context.push(format!("op: {}", op));
        }
        if let Some(entity_id) = &self.context.entity_id {
            context.push(format!("entity: {}", entity_id));
        }
        if let Some(request_id) = &self.context.request_id {
            context.push(format!("request: {}", request_id));
        }
        if !context.is_empty() {
            write!(f, " ({})", context.join(", "))?;
        }

        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Domain error taxonomy for catalog and change-log operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Incoming document has no usable `id`
    #[error("Document id is missing or empty")]
    DocumentIdMissing,

    /// Mandatory field absent from the incoming document
    #[error("mandatory field '{field}' is missing")]
    MandatoryFieldMissing { field: String },

    /// Mandatory field present but empty
    #[error("mandatory field '{field}' is empty")]
    MandatoryFieldEmpty { field: String },

    /// Document root is not an object
    #[error("Invalid document: {reason}")]
    InvalidDocument { reason: String },

    /// `since` expression failed validation
    #[error("Invalid since expression: '{value}' (expected <positive-integer><d|w>)")]
    InvalidSince { value: String },

    /// Document not found in the document store
    #[error("Document not found: {document_id}")]
    DocumentNotFound { document_id: String },

    /// Another changeset already holds this order for the document
    #[error("Changeset order {order} already taken for document {document_id}")]
    OrderConflict { document_id: String, order: i64 },
}

impl From<CatalogError> for ExError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::DocumentIdMissing => {
                ExError::new(ExErrorKind::MissingField).with_message(message)
            }
            CatalogError::MandatoryFieldMissing { field }
            | CatalogError::MandatoryFieldEmpty { field } => {
                ExError::new(ExErrorKind::MissingField)
                    .with_entity_id(field)
                    .with_message(message)
            }
            CatalogError::InvalidDocument { .. } | CatalogError::InvalidSince { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            CatalogError::DocumentNotFound { document_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(document_id)
                    .with_message(message)
            }
            CatalogError::OrderConflict { document_id, .. } => {
                ExError::new(ExErrorKind::Conflict)
                    .with_entity_id(document_id)
                    .with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_status_mapping() {
        assert_eq!(ExErrorKind::InvalidInput.client_status(), 400);
        assert_eq!(ExErrorKind::MissingField.client_status(), 400);
        assert_eq!(ExErrorKind::NotFound.client_status(), 404);
        assert_eq!(ExErrorKind::Conflict.client_status(), 409);
        assert_eq!(ExErrorKind::Persistence.client_status(), 500);
    }

    #[test]
    fn test_invalid_since_maps_to_invalid_input() {
        let err: ExError = CatalogError::InvalidSince {
            value: "32h".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert!(err.message().contains("32h"));
    }

    #[test]
    fn test_not_found_carries_document_id() {
        let err: ExError = CatalogError::DocumentNotFound {
            document_id: "randomId".to_string(),
        }
        .into();
        assert_eq!(err.code(), "ERR_NOT_FOUND");
        assert_eq!(err.entity_id(), Some("randomId"));
    }

    #[test]
    fn test_display_includes_source() {
        let inner = ExError::new(ExErrorKind::Persistence).with_message("disk full");
        let outer = ExError::new(ExErrorKind::Internal)
            .with_op("upsert_document")
            .with_source(inner);
        assert_eq!(
            outer.to_string(),
            "ERR_INTERNAL (op: upsert_document); caused by ERR_PERSISTENCE: disk full"
        );
        assert!(!outer.kind().is_client_error());
    }
}
