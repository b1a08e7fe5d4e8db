//! Document tree model.
//!
//! Documents are arbitrary JSON-shaped trees. The core works on this explicit
//! sum type rather than on `serde_json::Value` so that path building and value
//! stringification are total functions over a closed set of variants.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// One node of a document tree.
///
/// Object members iterate in key order, which keeps diff output deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Tree>),
    Object(BTreeMap<String, Tree>),
}

impl Tree {
    /// An empty object node.
    pub fn empty_object() -> Self {
        Tree::Object(BTreeMap::new())
    }

    /// Look up a direct member of an object node.
    pub fn get(&self, key: &str) -> Option<&Tree> {
        match self {
            Tree::Object(members) => members.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tree::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Tree>> {
        match self {
            Tree::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut BTreeMap<String, Tree>> {
        match self {
            Tree::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Tree::Null)
    }

    /// True for arrays and objects.
    pub fn is_container(&self) -> bool {
        matches!(self, Tree::Array(_) | Tree::Object(_))
    }

    /// Textual value of a scalar node, as a lenient "as text" accessor.
    ///
    /// Strings are returned unquoted, numbers and booleans in their JSON form,
    /// `null` and containers yield an empty string.
    pub fn as_text(&self) -> String {
        match self {
            Tree::String(s) => s.clone(),
            Tree::Number(n) => n.to_string(),
            Tree::Bool(b) => b.to_string(),
            Tree::Null | Tree::Array(_) | Tree::Object(_) => String::new(),
        }
    }

    /// Compact JSON text of this node.
    ///
    /// A string node yields its quoted, escaped literal (`"a"`), containers
    /// yield their bracketed/braced form with members in key order.
    pub fn canonical_text(&self) -> String {
        Value::from(self).to_string()
    }
}

impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Tree::Null,
            Value::Bool(b) => Tree::Bool(b),
            Value::Number(n) => Tree::Number(n),
            Value::String(s) => Tree::String(s),
            Value::Array(items) => Tree::Array(items.into_iter().map(Tree::from).collect()),
            Value::Object(members) => Tree::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, Tree::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Tree> for Value {
    fn from(tree: &Tree) -> Self {
        match tree {
            Tree::Null => Value::Null,
            Tree::Bool(b) => Value::Bool(*b),
            Tree::Number(n) => Value::Number(n.clone()),
            Tree::String(s) => Value::String(s.clone()),
            Tree::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Tree::Object(members) => {
                let mut map = Map::new();
                for (k, v) in members {
                    map.insert(k.clone(), Value::from(v));
                }
                Value::Object(map)
            }
        }
    }
}

impl From<Tree> for Value {
    fn from(tree: Tree) -> Self {
        Value::from(&tree)
    }
}

impl From<&str> for Tree {
    fn from(s: &str) -> Self {
        Tree::String(s.to_string())
    }
}

impl From<String> for Tree {
    fn from(s: String) -> Self {
        Tree::String(s)
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Tree::from)
    }
}

impl std::fmt::Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical_text())
    }
}
