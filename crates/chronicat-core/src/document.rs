//! Incoming document handling.
//!
//! Helpers applied to a document before it is diffed and stored: mandatory
//! field validation, null pruning and volatile field stamping.

use crate::errors::CatalogError;
use crate::tree::Tree;

pub const FIELD_ID: &str = "id";
pub const FIELD_CREATED: &str = "created";
pub const FIELD_LAST_UPDATE: &str = "lastUpdate";
pub const FIELD_LAST_UPLOAD: &str = "lastUpload";

/// Fields every catalog document must carry with a non-empty value.
pub const MANDATORY_FIELDS: [&str; 5] = ["id", "type", "name", "owner", "description"];

/// The document's `id` as text, if present and non-empty.
pub fn document_id(document: &Tree) -> Option<String> {
    document
        .get(FIELD_ID)
        .map(Tree::as_text)
        .filter(|id| !id.is_empty())
}

/// True when [`Tree::as_text`] would yield an empty string.
fn has_empty_text(value: &Tree) -> bool {
    match value {
        Tree::String(s) => s.is_empty(),
        Tree::Null | Tree::Array(_) | Tree::Object(_) => true,
        Tree::Number(_) | Tree::Bool(_) => false,
    }
}

/// Check the root shape and the mandatory fields.
///
/// # Errors
///
/// - `InvalidDocument` if the root is not an object
/// - `DocumentIdMissing` if `id` is absent or empty
/// - `MandatoryFieldMissing` for the first absent mandatory field
/// - `MandatoryFieldEmpty` for the first mandatory field whose text is empty
pub fn validate_mandatory_fields(document: &Tree) -> Result<(), CatalogError> {
    if document.as_object().is_none() {
        return Err(CatalogError::InvalidDocument {
            reason: "document root must be an object".to_string(),
        });
    }
    if document_id(document).is_none() {
        return Err(CatalogError::DocumentIdMissing);
    }
    if let Some(field) = MANDATORY_FIELDS
        .iter()
        .find(|field| document.get(field).is_none())
    {
        return Err(CatalogError::MandatoryFieldMissing {
            field: field.to_string(),
        });
    }
    if let Some(field) = MANDATORY_FIELDS
        .iter()
        .find(|field| document.get(field).map_or(true, has_empty_text))
    {
        return Err(CatalogError::MandatoryFieldEmpty {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Remove `null` members and elements, then any container left empty.
///
/// Containers that were empty to begin with are removed as well. The root
/// itself is never removed.
pub fn remove_null_members(document: &mut Tree) {
    match document {
        Tree::Object(members) => {
            members.retain(|_, value| prune(value));
        }
        Tree::Array(items) => {
            items.retain_mut(prune);
        }
        _ => {}
    }
}

// Returns whether the node should be kept
fn prune(node: &mut Tree) -> bool {
    match node {
        Tree::Null => false,
        Tree::Object(members) => {
            members.retain(|_, value| prune(value));
            !members.is_empty()
        }
        Tree::Array(items) => {
            items.retain_mut(prune);
            !items.is_empty()
        }
        _ => true,
    }
}

/// Stamp the service-maintained timestamps.
///
/// - `created` is copied from the stored predecessor, or set to `now` for a new document
/// - `lastUpload` is always `now`
/// - `lastUpdate` is `now` when the content changed, otherwise the predecessor's
///   value (or `now` if the predecessor has none)
pub fn stamp_volatile_fields(
    document: &mut Tree,
    previous: Option<&Tree>,
    now: &str,
    content_changed: bool,
) {
    let carried = |field: &str| {
        previous
            .and_then(|p| p.get(field))
            .cloned()
            .unwrap_or_else(|| Tree::from(now))
    };
    let created = carried(FIELD_CREATED);
    let last_update = if content_changed {
        Tree::from(now)
    } else {
        carried(FIELD_LAST_UPDATE)
    };

    if let Some(members) = document.as_object_mut() {
        members.insert(FIELD_CREATED.to_string(), created);
        members.insert(FIELD_LAST_UPLOAD.to_string(), Tree::from(now));
        members.insert(FIELD_LAST_UPDATE.to_string(), last_update);
    }
}
