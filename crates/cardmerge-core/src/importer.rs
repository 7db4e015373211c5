//! The importer: staging document in, target document rewritten.
//!
//! A run resolves the staging `Source` to `<target_dir>/<Source>.json`,
//! merges the staged records into the configured record field and writes
//! the target back in place. A missing target is not an error; the run
//! reports it and leaves the filesystem untouched.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::ImportConfig;
use crate::merge::{merge_records, MergeReport};
use crate::model::{StagingDocument, TargetDocument};

/// What a run did.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// The staging document does not name a target.
    NoSource,
    /// The named target file does not exist; nothing was written.
    TargetMissing { target: PathBuf },
    /// The merge ran. `written` is false for dry runs.
    Merged {
        target: PathBuf,
        report: MergeReport,
        written: bool,
    },
}

/// Merges staging documents into target collections.
#[derive(Debug, Clone)]
pub struct Importer {
    config: ImportConfig,
    dry_run: bool,
}

impl Importer {
    pub fn new(config: ImportConfig) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    /// Compute the merge without writing the target file.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Read the configured staging file and import it.
    pub fn run(&self) -> Result<ImportOutcome> {
        let staging = StagingDocument::load(&self.config.staging_file)?;
        self.import(&staging)
    }

    /// Import an already loaded staging document.
    pub fn import(&self, staging: &StagingDocument) -> Result<ImportOutcome> {
        let Some(source) = staging.target_name() else {
            tracing::warn!("staging document has no Source");
            return Ok(ImportOutcome::NoSource);
        };

        let target = self.config.target_path(source);
        if !target.is_file() {
            tracing::warn!(target = %target.display(), "target file not found");
            return Ok(ImportOutcome::TargetMissing { target });
        }

        let mut document = TargetDocument::load(&target)?;
        let records = document
            .records_mut(&self.config.record_field)
            .with_context(|| format!("invalid target file: {}", target.display()))?;

        tracing::debug!(
            target = %target.display(),
            existing = records.len(),
            staged = staging.data.len(),
            "merging records"
        );
        let report = merge_records(records, &staging.data);

        if !self.dry_run {
            document.save(&target)?;
        }

        Ok(ImportOutcome::Merged {
            target,
            report,
            written: !self.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::path::Path;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> ImportConfig {
        ImportConfig {
            staging_file: dir.join("import.json"),
            target_dir: dir.to_path_buf(),
            ..ImportConfig::default()
        }
    }

    fn write_json(path: &Path, value: &Value) {
        std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn merges_into_data_field() {
        let dir = TempDir::new().unwrap();
        write_json(
            &dir.path().join("deck.json"),
            &json!({"title": "Deck", "Data": [{"term": "A", "definition": "1"}]}),
        );
        write_json(
            &dir.path().join("import.json"),
            &json!({"Source": "deck", "Data": [
                {"term": "A", "definition": "2"},
                {"term": "B", "definition": "3"}
            ]}),
        );

        let outcome = Importer::new(config_in(dir.path())).run().unwrap();
        let ImportOutcome::Merged { report, written, .. } = outcome else {
            panic!("expected merge");
        };
        assert!(written);
        assert_eq!(report.added(), 1);
        assert_eq!(report.updated(), 1);
        assert_eq!(
            read_json(&dir.path().join("deck.json")),
            json!({"title": "Deck", "Data": [
                {"term": "A", "definition": "2"},
                {"term": "B", "definition": "3"}
            ]})
        );
    }

    #[test]
    fn merges_into_quiz_src_field() {
        let dir = TempDir::new().unwrap();
        write_json(
            &dir.path().join("quiz.json"),
            &json!({"quizSrc": [{"term": "A", "definition": "1"}], "Data": "untouched"}),
        );
        let config = ImportConfig {
            record_field: "quizSrc".into(),
            ..config_in(dir.path())
        };
        let staging = StagingDocument {
            source: Some("quiz".into()),
            data: vec![json!({"term": "B", "definition": "2"})],
        };

        Importer::new(config).import(&staging).unwrap();

        let saved = read_json(&dir.path().join("quiz.json"));
        assert_eq!(saved["quizSrc"].as_array().unwrap().len(), 2);
        assert_eq!(saved["Data"], "untouched");
    }

    #[test]
    fn missing_target_is_not_created() {
        let dir = TempDir::new().unwrap();
        let staging = StagingDocument {
            source: Some("absent".into()),
            data: vec![json!({"term": "A", "definition": "1"})],
        };

        let outcome = Importer::new(config_in(dir.path()))
            .import(&staging)
            .unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::TargetMissing {
                target: dir.path().join("absent.json")
            }
        );
        assert!(!dir.path().join("absent.json").exists());
    }

    #[test]
    fn padded_source_names_a_different_file() {
        let dir = TempDir::new().unwrap();
        let original = "{\"Data\": []}";
        std::fs::write(dir.path().join("deck.json"), original).unwrap();
        let staging = StagingDocument {
            source: Some(" deck ".into()),
            data: vec![json!({"term": "A", "definition": "1"})],
        };

        let outcome = Importer::new(config_in(dir.path()))
            .import(&staging)
            .unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::TargetMissing {
                target: dir.path().join(" deck .json")
            }
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("deck.json")).unwrap(),
            original
        );
    }

    #[test]
    fn missing_source_aborts() {
        let dir = TempDir::new().unwrap();
        let outcome = Importer::new(config_in(dir.path()))
            .import(&StagingDocument::default())
            .unwrap();
        assert_eq!(outcome, ImportOutcome::NoSource);
    }

    #[test]
    fn dry_run_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let original = "{\"Data\": []}";
        std::fs::write(dir.path().join("deck.json"), original).unwrap();
        let staging = StagingDocument {
            source: Some("deck".into()),
            data: vec![json!({"term": "A", "definition": "1"})],
        };

        let outcome = Importer::new(config_in(dir.path()))
            .dry_run(true)
            .import(&staging)
            .unwrap();

        assert!(matches!(outcome, ImportOutcome::Merged { written: false, .. }));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("deck.json")).unwrap(),
            original
        );
    }

    #[test]
    fn second_run_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        write_json(&dir.path().join("deck.json"), &json!({"Data": []}));
        write_json(
            &dir.path().join("import.json"),
            &json!({"Source": "deck", "Data": [{"term": "chào", "definition": "hello"}]}),
        );
        let importer = Importer::new(config_in(dir.path()));

        importer.run().unwrap();
        let first = std::fs::read_to_string(dir.path().join("deck.json")).unwrap();
        let outcome = importer.run().unwrap();
        let second = std::fs::read_to_string(dir.path().join("deck.json")).unwrap();

        assert_eq!(first, second);
        assert!(first.contains("chào"));
        let ImportOutcome::Merged { report, .. } = outcome else {
            panic!("expected merge");
        };
        assert!(!report.is_modified());
    }

    #[test]
    fn malformed_target_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("deck.json"), "{ broken").unwrap();
        let staging = StagingDocument {
            source: Some("deck".into()),
            data: vec![],
        };

        let err = Importer::new(config_in(dir.path()))
            .import(&staging)
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse target file"));
    }

    #[test]
    fn record_field_of_wrong_type_fails() {
        let dir = TempDir::new().unwrap();
        write_json(&dir.path().join("deck.json"), &json!({"Data": "nope"}));
        let staging = StagingDocument {
            source: Some("deck".into()),
            data: vec![],
        };

        let err = Importer::new(config_in(dir.path()))
            .import(&staging)
            .unwrap_err();
        assert!(format!("{err:#}").contains("must be an array"));
    }
}
