//! The `cardmerge validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use cardmerge_core::config::load_config_from;
use cardmerge_core::validate::validate_records;
use cardmerge_core::TargetDocument;

pub fn execute(
    file: PathBuf,
    record_field: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<i32> {
    let field = match record_field {
        Some(f) => f,
        None => load_config_from(config_path.as_deref())?.record_field,
    };

    let document = TargetDocument::load(&file)?;
    let records = document
        .records(&field)
        .with_context(|| format!("invalid collection file: {}", file.display()))?;

    println!(
        "Collection: {} ({} records in `{field}`)",
        file.display(),
        records.len()
    );

    let warnings = validate_records(records);
    for w in &warnings {
        let prefix = match &w.term {
            Some(term) => format!("  [{}] {term}:", w.index),
            None => format!("  [{}]", w.index),
        };
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Collection valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(0)
}
