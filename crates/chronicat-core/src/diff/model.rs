//! Patch operation types.

use crate::tree::Tree;
use serde::{Deserialize, Serialize, Serializer};

/// Kind of a patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Add,
    Replace,
    Remove,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Replace => "replace",
            OpKind::Remove => "remove",
        }
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value carried by an `add` or `replace`.
///
/// Arrays and objects travel as their compact JSON text and are never encoded
/// again; scalars keep their node.
#[derive(Debug, Clone, PartialEq)]
pub enum OpValue {
    Scalar(Tree),
    Container(String),
}

impl OpValue {
    pub fn of(value: &Tree) -> Self {
        if value.is_container() {
            OpValue::Container(value.canonical_text())
        } else {
            OpValue::Scalar(value.clone())
        }
    }

    /// Scalars as [`Tree::as_text`], containers as their JSON text.
    pub fn as_text(&self) -> String {
        match self {
            OpValue::Scalar(tree) => tree.as_text(),
            OpValue::Container(text) => text.clone(),
        }
    }
}

impl Serialize for OpValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OpValue::Scalar(tree) => tree.serialize(serializer),
            OpValue::Container(text) => serializer.serialize_str(text),
        }
    }
}

/// A single change at one JSON-Pointer path.
///
/// `value` is present for `add`/`replace` and absent for `remove`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchOp {
    pub op: OpKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<OpValue>,
}

impl PatchOp {
    pub fn add(path: impl Into<String>, value: &Tree) -> Self {
        Self {
            op: OpKind::Add,
            path: path.into(),
            value: Some(OpValue::of(value)),
        }
    }

    pub fn replace(path: impl Into<String>, value: &Tree) -> Self {
        Self {
            op: OpKind::Replace,
            path: path.into(),
            value: Some(OpValue::of(value)),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: OpKind::Remove,
            path: path.into(),
            value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_container_value_is_carried_as_text() {
        let op = PatchOp::add("/provides", &Tree::from(json!(["a", "b"])));
        assert_eq!(op.value, Some(OpValue::Container(r#"["a","b"]"#.to_string())));
    }

    #[test]
    fn test_string_value_stays_scalar() {
        let op = PatchOp::add("/provides", &Tree::from(r#"["a"]"#));
        assert_eq!(op.value, Some(OpValue::Scalar(Tree::from(r#"["a"]"#))));
    }

    #[test]
    fn test_remove_has_no_value() {
        let op = PatchOp::remove("/owner");
        assert!(op.value.is_none());
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json, json!({"op": "remove", "path": "/owner"}));
    }
}
