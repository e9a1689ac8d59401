//! Client-side search over an already fetched card list.
//!
//! [`filter_cards`] is a pure case-insensitive substring filter. [`Debouncer`]
//! delays applying typed input until it has been stable for a short while;
//! it never affects what the filter returns for a given query.

use std::time::{Duration, Instant};

use crate::card::Card;

/// Default debounce delay for search input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Return the cards matching `query`, preserving their order.
///
/// A card matches when its word, its translation, or the text or translation
/// of any example contains the trimmed query, ignoring case. A blank query
/// matches everything.
#[must_use]
pub fn filter_cards<'a>(cards: &'a [Card], query: &str) -> Vec<&'a Card> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return cards.iter().collect();
    }
    cards.iter().filter(|card| matches(card, &needle)).collect()
}

/// Check one card against an already lowercased needle.
fn matches(card: &Card, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);

    contains(&card.word)
        || contains(&card.translation)
        || card
            .examples
            .iter()
            .any(|example| contains(&example.text) || contains(&example.translation))
}

/// Debounces raw search input.
///
/// Every call to [`Debouncer::input`] restarts the delay. Once the delay has
/// elapsed, [`Debouncer::poll`] applies the latest input exactly once. The
/// caller supplies the clock, so behaviour is fully deterministic.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
    applied: String,
}

impl Debouncer {
    /// Create a debouncer with the given delay and an empty applied query.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            applied: String::new(),
        }
    }

    /// Record new raw input typed at `now`.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now + self.delay));
    }

    /// Apply pending input whose deadline has passed.
    ///
    /// Returns the newly applied query, or `None` if nothing changed.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        let due = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if due {
            self.flush()
        } else {
            None
        }
    }

    /// Apply pending input immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<&str> {
        let (text, _) = self.pending.take()?;
        self.applied = text;
        Some(&self.applied)
    }

    /// The query currently in effect.
    #[must_use]
    pub fn applied(&self) -> &str {
        &self.applied
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
