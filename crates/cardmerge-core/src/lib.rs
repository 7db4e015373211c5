//! cardmerge-core — Flashcard record merging, conversion and validation.
//!
//! This crate holds the document model and the reconciliation logic that
//! imports a staging batch of term/definition records into a collection
//! file, keyed by term.

pub mod config;
pub mod convert;
pub mod error;
pub mod importer;
pub mod merge;
pub mod model;
pub mod validate;

pub use config::ImportConfig;
pub use importer::{ImportOutcome, Importer};
pub use merge::{merge_records, Change, MergeReport};
pub use model::{StagingDocument, TargetDocument};
