//! Core document types for cardmerge.
//!
//! Records are kept as raw JSON objects so that extra fields, and the order
//! of fields inside each record, survive a rewrite untouched.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{json_type_name, DocumentError};

/// Key that identifies a record within a collection.
pub const TERM_KEY: &str = "term";
/// Field overwritten when a staged record changes an existing one.
pub const DEFINITION_KEY: &str = "definition";

/// Returns the record's term, if it is an object with a string `term`.
pub fn record_term(record: &Value) -> Option<&str> {
    record.get(TERM_KEY).and_then(Value::as_str)
}

/// Returns the record's definition, if present.
pub fn record_definition(record: &Value) -> Option<&Value> {
    record.get(DEFINITION_KEY)
}

/// The batch of records to import, usually read from `import.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagingDocument {
    /// Name of the target collection, without the `.json` extension.
    #[serde(rename = "Source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Records to merge, in the order they should be appended.
    #[serde(rename = "Data", default)]
    pub data: Vec<Value>,
}

impl StagingDocument {
    /// Parse a staging document from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a staging document from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read staging file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("failed to parse staging file: {}", path.display()))
    }

    /// The target name exactly as written, unless it is missing or blank.
    pub fn target_name(&self) -> Option<&str> {
        self.source.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Write this document as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize staging")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write staging file: {}", path.display()))
    }
}

/// A persisted collection whose record list gets updated.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDocument {
    root: Map<String, Value>,
}

impl TargetDocument {
    /// Parse a target document; the top level must be a JSON object.
    pub fn from_json_str(content: &str) -> Result<Self, DocumentError> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(root) => Ok(Self { root }),
            other => Err(DocumentError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Load a target document from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read target file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("failed to parse target file: {}", path.display()))
    }

    /// Records stored under `field`, or an empty slice if the field is absent.
    pub fn records(&self, field: &str) -> Result<&[Value], DocumentError> {
        match self.root.get(field) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(DocumentError::RecordFieldNotArray {
                field: field.to_string(),
                found: json_type_name(other),
            }),
        }
    }

    /// Mutable record list under `field`, inserting an empty list if absent.
    pub fn records_mut(&mut self, field: &str) -> Result<&mut Vec<Value>, DocumentError> {
        let slot = self
            .root
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let found = json_type_name(slot);
        match slot {
            Value::Array(items) => Ok(items),
            _ => Err(DocumentError::RecordFieldNotArray {
                field: field.to_string(),
                found,
            }),
        }
    }

    /// Two-space indented JSON with non-ASCII text written as-is.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root).context("failed to serialize target document")
    }

    /// Overwrite `path` with this document.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json_string()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write target file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_staging_document() {
        let doc = StagingDocument::from_json_str(
            r#"{"Source": "biology", "Data": [{"term": "cell", "definition": "unit"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.target_name(), Some("biology"));
        assert_eq!(doc.data.len(), 1);
        assert_eq!(record_term(&doc.data[0]), Some("cell"));
    }

    #[test]
    fn staging_without_source_or_data() {
        let doc = StagingDocument::from_json_str("{}").unwrap();
        assert_eq!(doc.target_name(), None);
        assert!(doc.data.is_empty());

        let blank = StagingDocument::from_json_str(r#"{"Source": "  "}"#).unwrap();
        assert_eq!(blank.target_name(), None);
    }

    #[test]
    fn source_is_not_trimmed() {
        let doc = StagingDocument::from_json_str(r#"{"Source": " deck "}"#).unwrap();
        assert_eq!(doc.target_name(), Some(" deck "));
    }

    #[test]
    fn staging_malformed_json() {
        let err = StagingDocument::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }

    #[test]
    fn target_must_be_object() {
        let err = TargetDocument::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, DocumentError::NotAnObject { found: "an array" }));
    }

    #[test]
    fn records_mut_creates_missing_field() {
        let mut doc = TargetDocument::from_json_str(r#"{"title": "x"}"#).unwrap();
        assert!(doc.records("quizSrc").unwrap().is_empty());
        doc.records_mut("quizSrc").unwrap().push(json!({"term": "a"}));
        assert_eq!(doc.records("quizSrc").unwrap().len(), 1);
    }

    #[test]
    fn records_field_not_array() {
        let mut doc = TargetDocument::from_json_str(r#"{"Data": {"term": "a"}}"#).unwrap();
        let err = doc.records_mut("Data").unwrap_err();
        assert!(err.to_string().contains("`Data` must be an array"));
    }

    #[test]
    fn serialization_keeps_field_order_and_unicode() {
        let doc = TargetDocument::from_json_str(
            r#"{"zeta": 1, "Data": [{"definition": "tế bào", "term": "cell"}], "alpha": true}"#,
        )
        .unwrap();
        let out = doc.to_json_string().unwrap();
        assert!(out.find("zeta").unwrap() < out.find("alpha").unwrap());
        assert!(out.find("definition").unwrap() < out.find("\"term\"").unwrap());
        assert!(out.contains("tế bào"));
        assert!(out.contains("\n  \"Data\": ["));
    }
}
