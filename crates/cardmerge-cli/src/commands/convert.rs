//! The `cardmerge convert` command.

use std::path::PathBuf;

use anyhow::Result;

use cardmerge_core::convert::{convert_sides, load_sides};

pub fn execute(input: PathBuf, source: String, output: PathBuf) -> Result<i32> {
    anyhow::ensure!(!source.trim().is_empty(), "--source must not be empty");

    let sides = load_sides(&input)?;
    let staging = convert_sides(source.trim(), &sides);
    staging.save(&output)?;

    println!(
        "Converted {} of {} cards into {} (Source: {})",
        staging.data.len(),
        sides.len(),
        output.display(),
        source.trim()
    );

    Ok(0)
}
