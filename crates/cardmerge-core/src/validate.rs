//! Collection checks.
//!
//! Reports records that the importer would not be able to key, and terms
//! that appear more than once in a record list.

use std::collections::HashMap;

use serde_json::Value;

use crate::model::{record_definition, record_term};

/// A warning about a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordWarning {
    /// Position of the record in the list.
    pub index: usize,
    /// The record's term, if it has one.
    pub term: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a record list for missing keys and duplicate terms.
pub fn validate_records(records: &[Value]) -> Vec<RecordWarning> {
    let mut warnings = Vec::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        if !record.is_object() {
            warnings.push(RecordWarning {
                index,
                term: None,
                message: "record is not an object".into(),
            });
            continue;
        }

        let Some(term) = record_term(record) else {
            warnings.push(RecordWarning {
                index,
                term: None,
                message: "record has no term".into(),
            });
            continue;
        };

        if let Some(&first) = first_seen.get(term) {
            warnings.push(RecordWarning {
                index,
                term: Some(term.to_string()),
                message: format!("duplicate term, first seen at record {first}"),
            });
        } else {
            first_seen.insert(term, index);
        }

        if record_definition(record).is_none() {
            warnings.push(RecordWarning {
                index,
                term: Some(term.to_string()),
                message: "record has no definition".into(),
            });
        }
    }

    warnings
}
