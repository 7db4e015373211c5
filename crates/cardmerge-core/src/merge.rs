//! Record reconciliation.
//!
//! Merges staged records into an existing record list keyed by `term`.
//! Existing records keep their position; unknown terms are appended in
//! staging order; a known term only rewrites `definition`, and only when it
//! actually changed.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::model::{record_definition, record_term, DEFINITION_KEY};

/// One observable effect of merging a staged record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// A record with a new term was appended.
    Added { term: String },
    /// An existing record's definition was replaced.
    Updated {
        term: String,
        previous: Option<Value>,
        current: Value,
    },
    /// A staged record was ignored.
    Skipped { index: usize, reason: SkipReason },
}

/// Why a staged record was not merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The staged entry is not a JSON object.
    NotAnObject,
    /// The staged record has no string `term`.
    MissingTerm,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotAnObject => write!(f, "not an object"),
            SkipReason::MissingTerm => write!(f, "no term"),
        }
    }
}

/// Outcome of a merge, in staging order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    pub changes: Vec<Change>,
    /// Staged records whose term and definition already matched.
    pub unchanged: usize,
}

impl MergeReport {
    pub fn added(&self) -> usize {
        self.count(|c| matches!(c, Change::Added { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|c| matches!(c, Change::Updated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|c| matches!(c, Change::Skipped { .. }))
    }

    /// Returns `true` if the merge modified the record list.
    pub fn is_modified(&self) -> bool {
        self.added() + self.updated() > 0
    }

    fn count(&self, pred: impl Fn(&Change) -> bool) -> usize {
        self.changes.iter().filter(|c| pred(c)).count()
    }
}

/// Merge `staged` into `records` in place.
///
/// When the existing list already contains a term more than once, the last
/// occurrence is the one that receives updates.
pub fn merge_records(records: &mut Vec<Value>, staged: &[Value]) -> MergeReport {
    let mut index: HashMap<String, usize> = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| record_term(r).map(|t| (t.to_string(), i)))
        .collect();

    let mut report = MergeReport::default();

    for (i, item) in staged.iter().enumerate() {
        if !item.is_object() {
            tracing::warn!(index = i, "skipping staged entry that is not an object");
            report.changes.push(Change::Skipped {
                index: i,
                reason: SkipReason::NotAnObject,
            });
            continue;
        }
        let Some(term) = record_term(item) else {
            tracing::warn!(index = i, "skipping staged record without a term");
            report.changes.push(Change::Skipped {
                index: i,
                reason: SkipReason::MissingTerm,
            });
            continue;
        };

        match index.get(term).copied() {
            Some(pos) => {
                // A staged record with no definition carries nothing to update.
                let Some(incoming) = record_definition(item) else {
                    report.unchanged += 1;
                    continue;
                };
                let existing = &mut records[pos];
                if record_definition(existing) == Some(incoming) {
                    report.unchanged += 1;
                    continue;
                }
                let previous = existing
                    .as_object_mut()
                    .and_then(|obj| obj.insert(DEFINITION_KEY.to_string(), incoming.clone()));
                tracing::debug!(term, "definition updated");
                report.changes.push(Change::Updated {
                    term: term.to_string(),
                    previous,
                    current: incoming.clone(),
                });
            }
            None => {
                index.insert(term.to_string(), records.len());
                records.push(item.clone());
                tracing::debug!(term, "record added");
                report.changes.push(Change::Added {
                    term: term.to_string(),
                });
            }
        }
    }

    report
}
