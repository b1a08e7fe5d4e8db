//! Import-file parser
//!
//! Reads catalog documents for bulk loading. A file is YAML (JSON is accepted
//! as a YAML subset) and holds one of:
//!
//! - a single document (a mapping)
//! - a sequence of documents
//! - a mapping with a `documents` sequence and no `id` of its own
//!
//! A directory imports every `*.yaml`, `*.yml` and `*.json` file directly
//! inside it, in sorted filename order.

#![allow(clippy::result_large_err)]

use crate::errors::{import_invalid, io_error, Result};
use chronicat_core::tree::Tree;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const IMPORT_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Documents parsed from one import file, in file order
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub path: PathBuf,
    pub documents: Vec<Tree>,
}

/// Files to import for a path: the file itself, or the matching files of a directory
pub fn collect_import_paths(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).map_err(|e| io_error("import_read_dir", e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_error("import_read_dir", e))?;
        let candidate = entry.path();
        let matches = candidate
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMPORT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if candidate.is_file() && matches {
            files.push(candidate);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse an import file from a path
pub fn parse_import_file(path: &Path) -> Result<ImportFile> {
    let content = fs::read_to_string(path).map_err(|e| io_error("import_read_file", e))?;
    let documents = parse_import_str(&content)
        .map_err(|e| e.with_entity_id(path.display().to_string()))?;
    Ok(ImportFile {
        path: path.to_path_buf(),
        documents,
    })
}

/// Parse import content from a string
pub fn parse_import_str(content: &str) -> Result<Vec<Tree>> {
    let root: Value = serde_yaml::from_str(content)
        .map_err(|e| import_invalid(&format!("YAML parse error: {}", e)))?;

    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut map) if !map.contains_key("id") && map.contains_key("documents") => {
            match map.remove("documents") {
                Some(Value::Array(items)) => items,
                _ => return Err(import_invalid("`documents` must be a sequence")),
            }
        }
        single @ Value::Object(_) => vec![single],
        Value::Null => Vec::new(),
        _ => return Err(import_invalid("import file must hold a mapping or a sequence")),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(_) => Ok(Tree::from(item)),
            _ => Err(import_invalid(&format!(
                "entry {} is not a mapping",
                index
            ))),
        })
        .collect()
}
