//! `lexicard` - Vocabulary flashcards with a small JSON API
//!
//! This library provides the card model and store, the owner-scoped CRUD
//! repository, search and presentation state for a flashcard front end, and
//! the HTTP API that serves a deck.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod card;
pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod presentation;
pub mod repository;
pub mod search;
pub mod server;
pub mod storage;

pub use card::{Card, CardPatch, Example, NewCard, NewExample, DEFAULT_OWNER};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use repository::{CardRepository, SqliteCardRepository};
pub use search::{filter_cards, Debouncer};
pub use server::{build_router, AppState};
pub use storage::{DeckStats, Storage};
