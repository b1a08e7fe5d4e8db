//! Wire form of a changeset.
//!
//! A [`ChangesetRecord`] is what gets persisted and what retrieval returns.
//! Each field value is flattened to a plain string:
//!
//! - a string `"file.jar"` becomes `file.jar`
//! - a number `42` becomes `42`
//! - an array `["a","b"]` stays `["a","b"]`
//!
//! One leading and one trailing double quote are stripped from the value's
//! JSON text, then every `\"` is replaced by `"`. No other unescaping is done,
//! so `\\` and `\n` sequences stay as they appear in the JSON text. Container
//! text is taken as carried, so an array holding `say "hi"` comes out as
//! `["say "hi""]`.

use crate::changeset::model::Changeset;
use crate::diff::{OpKind, OpValue, PatchOp};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Serialized changeset, as stored and returned to readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangesetRecord {
    pub document: String,
    pub order: i64,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
    pub fields: Vec<FieldRecord>,
}

/// One serialized patch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub op: OpKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl From<&PatchOp> for FieldRecord {
    fn from(op: &PatchOp) -> Self {
        Self {
            op: op.op,
            path: op.path.clone(),
            value: op.value.as_ref().map(wire_value),
        }
    }
}

impl From<&Changeset> for ChangesetRecord {
    fn from(changeset: &Changeset) -> Self {
        Self {
            document: changeset.document().to_string(),
            order: changeset.order(),
            timestamp: changeset.timestamp(),
            fields: changeset.fields().iter().map(FieldRecord::from).collect(),
        }
    }
}

/// Flatten a patch value to its wire string.
pub fn wire_value(value: &OpValue) -> String {
    let text = match value {
        OpValue::Scalar(tree) => tree.canonical_text(),
        OpValue::Container(text) => text.clone(),
    };
    let mut slice = text.as_str();
    if let Some(rest) = slice.strip_prefix('"') {
        slice = rest;
    }
    if let Some(rest) = slice.strip_suffix('"') {
        slice = rest;
    }
    slice.replace("\\\"", "\"")
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-10-15T08:30:00.125Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp produced by [`format_timestamp`] (any RFC 3339 offset accepted).
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|ts| ts.with_timezone(&Utc))
}

mod timestamp_format {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;
    use chrono::TimeZone;
    use serde_json::json;

    fn scalar(value: serde_json::Value) -> OpValue {
        OpValue::Scalar(Tree::from(value))
    }

    #[test]
    fn test_string_value_loses_quotes() {
        assert_eq!(wire_value(&scalar(json!("file.jar"))), "file.jar");
    }

    #[test]
    fn test_number_value_unchanged() {
        assert_eq!(wire_value(&scalar(json!(42))), "42");
        assert_eq!(wire_value(&scalar(json!(true))), "true");
    }

    #[test]
    fn test_container_text_passes_through() {
        let carried = OpValue::Container(r#"["a","b","c"]"#.to_string());
        assert_eq!(wire_value(&carried), r#"["a","b","c"]"#);
    }

    #[test]
    fn test_container_quotes_and_backslashes_encoded_once() {
        let carried = OpValue::of(&Tree::from(json!(["say \"hi\"", "a\\b"])));
        assert_eq!(wire_value(&carried), r#"["say "hi"","a\\b"]"#);
    }

    #[test]
    fn test_only_escaped_quotes_are_unescaped() {
        let value = scalar(json!("line\\one"));
        // backslash stays doubled, as in the JSON text
        assert_eq!(wire_value(&value), "line\\\\one");
    }

    #[test]
    fn test_record_json_shape() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 15, 8, 30, 0).unwrap();
        let cs = Changeset::with_timestamp(
            "svc-1",
            2,
            vec![
                PatchOp::replace("/name", &Tree::from("Macro")),
                PatchOp::remove("/owner"),
            ],
            ts,
        );
        let json = serde_json::to_value(ChangesetRecord::from(&cs)).unwrap();
        assert_eq!(
            json,
            json!({
                "document": "svc-1",
                "order": 2,
                "timestamp": "2026-10-15T08:30:00.000Z",
                "fields": [
                    {"op": "replace", "path": "/name", "value": "Macro"},
                    {"op": "remove", "path": "/owner"}
                ]
            })
        );
    }

    #[test]
    fn test_record_parses_back() {
        let text = r#"{"document":"d","order":1,"timestamp":"2026-10-15T08:30:00.125Z","fields":[]}"#;
        let record: ChangesetRecord = serde_json::from_str(text).unwrap();
        assert_eq!(record.timestamp.timestamp_subsec_millis(), 125);
    }
}
