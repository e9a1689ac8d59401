//! Core card types for lexicard.
//!
//! A [`Card`] is a word/translation pair with optional usage examples and a
//! known/unknown flag. [`NewCard`] and [`CardPatch`] are the shapes callers
//! send when creating or editing cards; both are validated here before
//! anything reaches the store.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Owner partition used when no user is given.
pub const DEFAULT_OWNER: &str = "default_user";

/// Pick the owner for a request: the trimmed `requested` value, or
/// `default_owner` when it is absent or blank.
#[must_use]
pub fn resolve_owner(requested: Option<&str>, default_owner: &str) -> String {
    match requested.map(str::trim) {
        Some(owner) if !owner.is_empty() => owner.to_string(),
        _ => default_owner.to_string(),
    }
}

/// A usage example attached to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    /// Identifier unique within the owning card.
    pub id: String,
    /// Example sentence in the language being learned.
    pub text: String,
    /// Translation of the example sentence.
    pub translation: String,
}

/// An example as supplied by a caller; the id is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewExample {
    /// Caller-chosen id, kept when unique within the card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Example sentence.
    pub text: String,
    /// Translation of the example sentence.
    pub translation: String,
}

impl NewExample {
    /// Create an example without an id.
    #[must_use]
    pub fn new(text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            translation: translation.into(),
        }
    }
}

impl From<Example> for NewExample {
    fn from(example: Example) -> Self {
        Self {
            id: Some(example.id),
            text: example.text,
            translation: example.translation,
        }
    }
}

/// A stored vocabulary card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Store-assigned identifier; never changes.
    pub id: String,
    /// Deck partition this card belongs to.
    #[serde(alias = "userId")]
    pub owner_id: String,
    /// The term being learned.
    pub word: String,
    /// The learner's known-language equivalent.
    pub translation: String,
    /// Usage examples, in display order.
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Whether the learner marked this word as known.
    #[serde(default)]
    pub is_known: bool,
    /// Last time the card was reviewed or edited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    /// When the card was stored.
    pub created_at: DateTime<Utc>,
    /// When the card was last written.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCard {
    /// The term being learned.
    pub word: String,
    /// Its translation.
    pub translation: String,
    /// Optional usage examples.
    pub examples: Vec<NewExample>,
    /// Initial known flag.
    pub is_known: bool,
}

impl NewCard {
    /// Create a card input with no examples.
    #[must_use]
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
            ..Self::default()
        }
    }

    /// Attach an example.
    #[must_use]
    pub fn with_example(mut self, text: impl Into<String>, translation: impl Into<String>) -> Self {
        self.examples.push(NewExample::new(text, translation));
        self
    }
}

/// Partial update for a stored card. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardPatch {
    /// Replacement word.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    /// Replacement translation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// Replacement example list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<NewExample>>,
    /// New known flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_known: Option<bool>,
    /// Explicit review time; stamped with the update time when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl CardPatch {
    /// A patch that only sets the known flag.
    #[must_use]
    pub fn known(is_known: bool) -> Self {
        Self {
            is_known: Some(is_known),
            ..Self::default()
        }
    }

    /// Check whether the patch carries no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.word.is_none()
            && self.translation.is_none()
            && self.examples.is_none()
            && self.is_known.is_none()
            && self.last_reviewed.is_none()
    }
}

impl Card {
    /// Build a new card from validated input, assigning a fresh id.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `word` or `translation` is blank.
    pub fn create(owner_id: &str, input: NewCard, now: DateTime<Utc>) -> Result<Self> {
        let word = required_text("word", &input.word)?;
        let translation = required_text("translation", &input.translation)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            word,
            translation,
            examples: normalize_examples(input.examples),
            is_known: input.is_known,
            last_reviewed: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merge a patch into this card.
    ///
    /// `last_reviewed` is set to the patch value, or to `now` when the patch
    /// does not carry one. `updated_at` always becomes `now`. The card is left
    /// untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a supplied `word` or `translation` is
    /// blank, or if `last_reviewed` falls outside years 0 to 9999.
    pub fn apply(&mut self, patch: CardPatch, now: DateTime<Utc>) -> Result<()> {
        if let Some(reviewed) = patch.last_reviewed {
            if !(0..=9999).contains(&reviewed.year()) {
                return Err(Error::validation("lastReviewed is out of range"));
            }
        }
        let word = patch
            .word
            .as_deref()
            .map(|w| required_text("word", w))
            .transpose()?;
        let translation = patch
            .translation
            .as_deref()
            .map(|t| required_text("translation", t))
            .transpose()?;

        if let Some(word) = word {
            self.word = word;
        }
        if let Some(translation) = translation {
            self.translation = translation;
        }
        if let Some(examples) = patch.examples {
            self.examples = normalize_examples(examples);
        }
        if let Some(is_known) = patch.is_known {
            self.is_known = is_known;
        }
        self.last_reviewed = Some(patch.last_reviewed.unwrap_or(now));
        self.updated_at = now;
        Ok(())
    }
}

/// Trim `value` and reject it when nothing is left.
fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Give every example an id that is unique within the list.
///
/// Caller ids are kept unless blank or already taken by an earlier entry.
#[must_use]
pub fn normalize_examples(examples: Vec<NewExample>) -> Vec<Example> {
    let mut seen = HashSet::with_capacity(examples.len());
    examples
        .into_iter()
        .map(|example| {
            let id = match example.id {
                Some(id) if !id.trim().is_empty() && !seen.contains(&id) => id,
                _ => Uuid::new_v4().to_string(),
            };
            seen.insert(id.clone());
            Example {
                id,
                text: example.text,
                translation: example.translation,
            }
        })
        .collect()
}
