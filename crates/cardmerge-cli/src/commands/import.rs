//! The `cardmerge import` command.

use anyhow::Result;
use serde_json::{json, Value};

use cardmerge_core::config::load_config_from;
use cardmerge_core::{Change, ImportOutcome, Importer, MergeReport};

use crate::ImportArgs;

/// Exit status for a missing target under `--strict`.
const EXIT_TARGET_MISSING: i32 = 2;

pub fn execute(args: ImportArgs) -> Result<i32> {
    let mut config = load_config_from(args.config.as_deref())?;
    if let Some(staging) = args.staging {
        config.staging_file = staging;
    }
    if let Some(dir) = args.target_dir {
        config.target_dir = dir;
    }
    if let Some(field) = args.record_field {
        anyhow::ensure!(!field.trim().is_empty(), "--record-field must not be empty");
        config.record_field = field;
    }

    tracing::debug!(?config, "resolved import config");
    let importer = Importer::new(config).dry_run(args.dry_run);
    let outcome = importer.run()?;

    if args.json {
        print_json(&outcome)?;
        let aborted = !matches!(outcome, ImportOutcome::Merged { .. });
        return Ok(if aborted {
            missing_exit_code(args.strict)
        } else {
            0
        });
    }

    match outcome {
        ImportOutcome::NoSource => {
            println!("⚠️ Staging file has no Source, nothing to import");
            Ok(missing_exit_code(args.strict))
        }
        ImportOutcome::TargetMissing { target } => {
            println!("⚠️ Target file not found: {}", target.display());
            Ok(missing_exit_code(args.strict))
        }
        ImportOutcome::Merged {
            target,
            report,
            written,
        } => {
            if written {
                print_changes(&report);
                println!("✅ Import complete into {}", target.display());
            } else {
                print_plan(&report);
                println!("Dry run: {} left unchanged", target.display());
            }
            print_counts(&report);
            Ok(0)
        }
    }
}

fn missing_exit_code(strict: bool) -> i32 {
    if strict {
        EXIT_TARGET_MISSING
    } else {
        0
    }
}

fn print_json(outcome: &ImportOutcome) -> Result<()> {
    let out = match outcome {
        ImportOutcome::NoSource => json!({ "status": "no_source" }),
        ImportOutcome::TargetMissing { target } => json!({
            "status": "target_missing",
            "target": target.display().to_string(),
        }),
        ImportOutcome::Merged {
            target,
            report,
            written,
        } => json!({
            "status": "merged",
            "target": target.display().to_string(),
            "written": written,
            "report": report,
        }),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn print_changes(report: &MergeReport) {
    for change in &report.changes {
        match change {
            Change::Added { term } => println!("➕ Added: {term}"),
            Change::Updated { term, .. } => println!("🔄 Updated definition: {term}"),
            Change::Skipped { .. } => {}
        }
    }
}

fn print_plan(report: &MergeReport) {
    use comfy_table::{Cell, Table};

    if report.changes.is_empty() {
        println!("No changes.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Action", "Term", "Before", "After"]);

    for change in &report.changes {
        let row = match change {
            Change::Added { term } => vec![
                Cell::new("add"),
                Cell::new(term),
                Cell::new(""),
                Cell::new(""),
            ],
            Change::Updated {
                term,
                previous,
                current,
            } => vec![
                Cell::new("update"),
                Cell::new(term),
                Cell::new(previous.as_ref().map(display_value).unwrap_or_default()),
                Cell::new(display_value(current)),
            ],
            Change::Skipped { index, reason } => vec![
                Cell::new("skip"),
                Cell::new(format!("#{index}")),
                Cell::new(reason.to_string()),
                Cell::new(""),
            ],
        };
        table.add_row(row);
    }

    println!("{table}");
}

fn print_counts(report: &MergeReport) {
    println!(
        "{} added, {} updated, {} unchanged, {} skipped",
        report.added(),
        report.updated(),
        report.unchanged,
        report.skipped()
    );
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
