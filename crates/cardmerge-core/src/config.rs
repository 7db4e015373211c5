//! Import configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "cardmerge.toml";

/// Where the importer reads from and which field holds the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Staging document to import.
    #[serde(default = "default_staging_file")]
    pub staging_file: PathBuf,
    /// Directory containing `<Source>.json` target files.
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,
    /// Top-level array in the target document that holds the records,
    /// e.g. `Data` or `quizSrc`.
    #[serde(default = "default_record_field")]
    pub record_field: String,
}

fn default_staging_file() -> PathBuf {
    PathBuf::from("import.json")
}
fn default_target_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_record_field() -> String {
    "Data".to_string()
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            staging_file: default_staging_file(),
            target_dir: default_target_dir(),
            record_field: default_record_field(),
        }
    }
}

impl ImportConfig {
    /// Path of the target document for a staging `Source` name.
    pub fn target_path(&self, source: &str) -> PathBuf {
        self.target_dir.join(format!("{source}.json"))
    }

    /// Apply `CARDMERGE_*` overrides using `lookup` to read variables.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("CARDMERGE_STAGING_FILE").filter(|v| !v.is_empty()) {
            self.staging_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("CARDMERGE_TARGET_DIR").filter(|v| !v.is_empty()) {
            self.target_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("CARDMERGE_RECORD_FIELD").filter(|v| !v.is_empty()) {
            self.record_field = v;
        }
    }
}

/// Load config from an explicit path, or from `cardmerge.toml` in the
/// working directory if present.
///
/// Environment variable overrides: `CARDMERGE_STAGING_FILE`,
/// `CARDMERGE_TARGET_DIR`, `CARDMERGE_RECORD_FIELD`.
pub fn load_config_from(path: Option<&Path>) -> Result<ImportConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => Some(PathBuf::from(CONFIG_FILE_NAME)).filter(|p| p.exists()),
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ImportConfig::default(),
    };

    config.apply_env_overrides(|key| std::env::var(key).ok());
    anyhow::ensure!(
        !config.record_field.trim().is_empty(),
        "record_field must not be empty"
    );

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<ImportConfig> {
    Ok(toml::from_str(content)?)
}
