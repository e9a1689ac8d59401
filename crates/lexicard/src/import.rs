//! Parsing of bulk-import files.
//!
//! Accepted formats:
//! - a JSON array of cards, or a JSON object with a `cards` array
//! - plain text, one `word <sep> translation` pair per line, where the
//!   separator is a tab or one of `-`, `=`, `:`, `;` surrounded by spaces.
//!   Blank lines and `#` comments are skipped.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::card::NewCard;
use crate::error::{Error, Result};

static PAIR_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\t+|\s+[-=:;]\s+").unwrap_or_else(|e| panic!("invalid separator regex: {e}"))
});

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonImport {
    List(Vec<NewCard>),
    Wrapped { cards: Vec<NewCard> },
}

/// Parse the contents of an import file into card inputs.
///
/// Text that starts with `[` or `{` is parsed as JSON, anything else as
/// delimited lines. Entries are not validated here; the repository does that
/// for the whole batch.
///
/// # Errors
///
/// Returns a validation error for malformed JSON or a text line without a
/// recognizable separator.
pub fn parse_import(input: &str) -> Result<Vec<NewCard>> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        parse_json(trimmed)
    } else {
        parse_lines(input)
    }
}

fn parse_json(input: &str) -> Result<Vec<NewCard>> {
    let parsed: JsonImport = serde_json::from_str(input)
        .map_err(|e| Error::validation(format!("invalid JSON import: {e}")))?;
    let cards = match parsed {
        JsonImport::List(cards) | JsonImport::Wrapped { cards } => cards,
    };
    debug!("Parsed {} cards from JSON import", cards.len());
    Ok(cards)
}

fn parse_lines(input: &str) -> Result<Vec<NewCard>> {
    let mut cards = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = PAIR_SEPARATOR.splitn(line, 2);
        match (parts.next(), parts.next()) {
            (Some(word), Some(translation)) => cards.push(NewCard::new(word, translation)),
            _ => {
                return Err(Error::validation(format!(
                    "line {}: expected `word - translation`, got {line:?}",
                    index + 1
                )))
            }
        }
    }
    debug!("Parsed {} cards from text import", cards.len());
    Ok(cards)
}
