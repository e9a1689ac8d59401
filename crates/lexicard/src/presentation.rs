//! Per-card presentation state.
//!
//! Models what a deck screen shows without depending on any UI toolkit:
//! which face each card displays, which single context menu is open, and
//! which cards the debounced search currently lets through. All transitions
//! are synchronous; repository calls are returned as values for the caller
//! to dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::card::{Card, CardPatch};
use crate::search::{filter_cards, Debouncer};

/// Which side of a card is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Face {
    /// The prompt side (the word).
    #[default]
    Front,
    /// The answer side (the translation and examples).
    Back,
}

impl Face {
    /// The opposite face.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

/// Where a click on a card landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The card body; flips the card.
    Body,
    /// A nested control (menu button, known toggle); does not flip.
    Control,
}

/// Flip state of one rendered card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    card_id: String,
    face: Face,
}

impl CardView {
    /// A view of the given card showing its front.
    #[must_use]
    pub fn new(card_id: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
            face: Face::Front,
        }
    }

    /// The card this view belongs to.
    #[must_use]
    pub fn card_id(&self) -> &str {
        &self.card_id
    }

    /// The face currently shown.
    #[must_use]
    pub fn face(&self) -> Face {
        self.face
    }

    /// Handle a click. Only clicks on the body flip the card.
    pub fn click(&mut self, target: ClickTarget) -> Face {
        if target == ClickTarget::Body {
            self.face = self.face.flipped();
        }
        self.face
    }

    /// Mark the card known or unknown.
    ///
    /// Resets the face to the front and returns the update to send.
    pub fn mark_known(&mut self, is_known: bool) -> CardPatch {
        self.face = Face::Front;
        CardPatch::known(is_known)
    }
}

/// Screen position a context menu is anchored at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// Actions offered by a card's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Open the editor for the card.
    Edit,
    /// Delete the card.
    Delete,
}

/// The single context-menu slot of a deck screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Menu {
    /// No menu is shown.
    #[default]
    Closed,
    /// A menu is shown for one card.
    Open {
        /// Card the menu belongs to.
        card_id: String,
        /// Where the menu is anchored.
        anchor: Anchor,
    },
}

impl Menu {
    /// Id of the card whose menu is open.
    #[must_use]
    pub fn open_card(&self) -> Option<&str> {
        match self {
            Self::Closed => None,
            Self::Open { card_id, .. } => Some(card_id),
        }
    }
}

/// What the caller should do after a menu action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuIntent {
    /// Show the editor for this card.
    Edit {
        /// Card to edit.
        card_id: String,
    },
    /// Issue a delete for this card.
    Delete {
        /// Card to delete.
        card_id: String,
    },
}

/// Presentation state of a whole deck screen.
#[derive(Debug, Clone)]
pub struct DeckView {
    cards: Vec<Card>,
    views: HashMap<String, CardView>,
    menu: Menu,
    search: Debouncer,
}

impl DeckView {
    /// Build a deck screen over a fetched card list.
    #[must_use]
    pub fn new(cards: Vec<Card>, debounce: Duration) -> Self {
        let views = cards
            .iter()
            .map(|card| (card.id.clone(), CardView::new(card.id.clone())))
            .collect();
        Self {
            cards,
            views,
            menu: Menu::Closed,
            search: Debouncer::new(debounce),
        }
    }

    /// All cards, in fetch order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards matching the applied search query, in fetch order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Card> {
        filter_cards(&self.cards, self.search.applied())
    }

    /// Face shown for a card; `None` for unknown ids.
    #[must_use]
    pub fn face(&self, card_id: &str) -> Option<Face> {
        self.views.get(card_id).map(CardView::face)
    }

    /// Forward a click to one card.
    pub fn click(&mut self, card_id: &str, target: ClickTarget) -> Option<Face> {
        self.views.get_mut(card_id).map(|view| view.click(target))
    }

    /// Mark a card known/unknown; returns the update to send.
    pub fn mark_known(&mut self, card_id: &str, is_known: bool) -> Option<CardPatch> {
        self.views
            .get_mut(card_id)
            .map(|view| view.mark_known(is_known))
    }

    /// The menu slot.
    #[must_use]
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Open the menu of one card, closing any other open menu.
    pub fn open_menu(&mut self, card_id: &str, anchor: Anchor) {
        if self.views.contains_key(card_id) {
            self.menu = Menu::Open {
                card_id: card_id.to_string(),
                anchor,
            };
        }
    }

    /// Close the open menu, if any.
    pub fn close_menu(&mut self) {
        self.menu = Menu::Closed;
    }

    /// Choose an action from the open menu. The menu closes either way.
    pub fn choose(&mut self, action: MenuAction) -> Option<MenuIntent> {
        let Menu::Open { card_id, .. } = std::mem::take(&mut self.menu) else {
            return None;
        };
        Some(match action {
            MenuAction::Edit => MenuIntent::Edit { card_id },
            MenuAction::Delete => MenuIntent::Delete { card_id },
        })
    }

    /// Record search input typed at `now`.
    pub fn type_query(&mut self, text: impl Into<String>, now: Instant) {
        self.search.input(text, now);
    }

    /// Apply due search input. Returns `true` if the visible set may have changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.search.poll(now).is_some()
    }

    /// The search query currently in effect.
    #[must_use]
    pub fn query(&self) -> &str {
        self.search.applied()
    }

    /// Prepend a freshly created batch, given in input order.
    ///
    /// A batch shares one `createdAt`, so a fresh list returns it last entry
    /// first; the batch is reversed to match.
    pub fn created(&mut self, cards: Vec<Card>) {
        for card in &cards {
            self.views
                .insert(card.id.clone(), CardView::new(card.id.clone()));
        }
        self.cards.splice(0..0, cards.into_iter().rev());
    }

    /// Replace a card with its updated version. The face is kept.
    pub fn updated(&mut self, card: Card) {
        if let Some(slot) = self.cards.iter_mut().find(|c| c.id == card.id) {
            *slot = card;
        }
    }

    /// Drop a deleted card and any state attached to it.
    pub fn deleted(&mut self, card_id: &str) {
        self.cards.retain(|c| c.id != card_id);
        self.views.remove(card_id);
        if self.menu.open_card() == Some(card_id) {
            self.menu = Menu::Closed;
        }
    }
}
