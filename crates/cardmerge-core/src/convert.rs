//! Conversion of raw card sides into staging records.
//!
//! Scraped flashcards arrive as two blobs of text per card. Multiple-choice
//! fronts look like `What is H2O? A. salt B. water C. air` and their backs
//! name the correct letters (`B` or `A, C`). Conversion turns each pair into
//! a `{term, definition}` record where the definition is the text of the
//! correct choices.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::model::{StagingDocument, DEFINITION_KEY, TERM_KEY};

/// The two raw text sides of one card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSides {
    pub front: String,
    pub back: String,
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn choice_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" ([A-Z])\. ").expect("valid regex"))
}

/// Trim and collapse every whitespace run to a single space.
pub fn clean_text(raw: &str) -> String {
    whitespace_re().replace_all(raw.trim(), " ").into_owned()
}

/// The question part of a front: everything before the first choice marker.
pub fn extract_question(front: &str) -> &str {
    match choice_marker_re().find(front) {
        Some(m) => &front[..m.start()],
        None => front,
    }
}

/// Choice letters mapped to their text. Later duplicates win.
pub fn extract_choices(front: &str) -> BTreeMap<String, String> {
    let re = choice_marker_re();

    // Markers may share a space (" A. B. x"), so search from every offset.
    let mut markers = Vec::new();
    let mut pos = 0;
    while let Some(caps) = re.captures_at(front, pos) {
        let (Some(whole), Some(letter)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        markers.push((whole.start(), whole.end(), letter.as_str().to_string()));
        pos = whole.start() + 1;
    }

    let mut choices = BTreeMap::new();
    for (i, (_, text_start, letter)) in markers.iter().enumerate() {
        let text_end = markers.get(i + 1).map_or(front.len(), |next| next.0);
        if *text_start > text_end {
            continue;
        }
        choices.insert(letter.clone(), front[*text_start..text_end].trim().to_string());
    }
    choices
}

/// Resolve a back side against the choices; falls back to the back verbatim.
pub fn resolve_definition(back: &str, choices: &BTreeMap<String, String>) -> String {
    let correct: Vec<&str> = back
        .split(',')
        .map(str::trim)
        .filter_map(|letter| choices.get(letter).map(String::as_str))
        .filter(|text| !text.is_empty())
        .collect();

    if correct.is_empty() {
        back.to_string()
    } else {
        correct.join(", ")
    }
}

/// Convert one card, or `None` if either side is blank.
pub fn convert_card(sides: &CardSides) -> Option<serde_json::Value> {
    let front = clean_text(&sides.front);
    let back = clean_text(&sides.back);
    if front.is_empty() || back.is_empty() {
        return None;
    }

    let choices = extract_choices(&front);
    let definition = resolve_definition(&back, &choices);
    Some(json!({
        TERM_KEY: extract_question(&front),
        DEFINITION_KEY: definition,
    }))
}

/// Build a staging document for `source` from raw card sides.
pub fn convert_sides(source: &str, sides: &[CardSides]) -> StagingDocument {
    let data = sides
        .iter()
        .enumerate()
        .filter_map(|(i, card)| {
            let record = convert_card(card);
            if record.is_none() {
                tracing::warn!(index = i, "skipping card with a blank side");
            }
            record
        })
        .collect();

    StagingDocument {
        source: Some(source.to_string()),
        data,
    }
}

/// Load a JSON array of card sides.
pub fn load_sides(path: &Path) -> Result<Vec<CardSides>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read card sides: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse card sides: {}", path.display()))
}
