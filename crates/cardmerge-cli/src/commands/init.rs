//! The `cardmerge init` command.

use std::path::Path;

use anyhow::Result;

use cardmerge_core::config::CONFIG_FILE_NAME;

pub fn execute() -> Result<i32> {
    if Path::new(CONFIG_FILE_NAME).exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE_NAME, SAMPLE_CONFIG)?;
        println!("Created {CONFIG_FILE_NAME}");
    }

    println!("\nNext steps:");
    println!("  1. Set record_field in {CONFIG_FILE_NAME} (Data or quizSrc)");
    println!("  2. Put your batch in import.json with a Source naming the collection");
    println!("  3. Run: cardmerge");

    Ok(0)
}

const SAMPLE_CONFIG: &str = r#"# cardmerge configuration

# Staging batch to import.
staging_file = "import.json"

# Directory holding <Source>.json collection files.
target_dir = "."

# Top-level array in the collection that holds the records.
record_field = "Data"
"#;
