//! JSON file record source
//!
//! Reads a JSON array of raw records, as exported from the ledger index or
//! the custom transaction backend.

use std::path::{Path, PathBuf};

use crate::domain::result::{Error, Result};
use crate::domain::SourceRecord;
use crate::ports::{FetchRecordsResult, RecordSource};

pub struct JsonFileSource {
    name: String,
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("file:{}", path.display());
        Self { name, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_records(&self) -> Result<FetchRecordsResult> {
        let content = std::fs::read_to_string(&self.path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        // Accept a bare array or an object wrapping one ({"transactions": [...]})
        let items = match value {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut map) => match map.remove("transactions") {
                Some(serde_json::Value::Array(items)) => items,
                _ => {
                    return Err(Error::source(format!(
                        "{}: expected an array of records",
                        self.path.display()
                    )))
                }
            },
            _ => {
                return Err(Error::source(format!(
                    "{}: expected an array of records",
                    self.path.display()
                )))
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            // Untagged fallback means this only fails on exotic input
            records.push(serde_json::from_value::<SourceRecord>(item)?);
        }

        Ok(FetchRecordsResult {
            records,
            warnings: Vec::new(),
        })
    }
}

/// Load an id -> label override map (user-set labels kept by the backend)
///
/// Accepts either an object (`{"42": "Refund"}`) or a list of
/// `{"id": 42, "label": "Refund"}` records.
pub fn load_label_overrides(path: &Path) -> Result<std::collections::HashMap<String, String>> {
    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let mut overrides = std::collections::HashMap::new();

    match value {
        serde_json::Value::Object(map) => {
            for (id, label) in map {
                if let Some(label) = label.as_str() {
                    overrides.insert(id, label.to_string());
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                let id = match item.get("id") {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(serde_json::Value::Number(n)) => n.to_string(),
                    _ => continue,
                };
                if let Some(label) = item.get("label").and_then(|l| l.as_str()) {
                    overrides.insert(id, label.to_string());
                }
            }
        }
        _ => {
            return Err(Error::validation(format!(
                "{}: expected an object or array of labels",
                path.display()
            )))
        }
    }

    Ok(overrides)
}
