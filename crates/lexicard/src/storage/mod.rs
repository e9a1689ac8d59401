//! Storage layer for lexicard.
//!
//! This module provides `SQLite`-based persistent storage for cards. It is a
//! plain record store: it does not validate cards or stamp timestamps, which
//! is the repository's job.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::card::{Card, Example};
use crate::error::{Error, Result};

const CARD_COLUMNS: &str = "id, owner_id, word, translation, examples, is_known, \
                            last_reviewed, created_at, updated_at";

/// Storage engine for cards.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Batch insertion inside a single transaction
/// - Listing a deck newest-first
/// - Whole-record replacement and deletion by id
/// - Per-deck statistics
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert cards in one transaction.
    ///
    /// Either every card is stored or none is.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; the transaction is rolled back.
    pub fn insert_batch(&mut self, cards: &[Card]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r"
                INSERT INTO cards (id, owner_id, word, translation, examples, is_known,
                                   last_reviewed, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ",
            )?;
            for card in cards {
                stmt.execute(params![
                    card.id,
                    card.owner_id,
                    card.word,
                    card.translation,
                    serde_json::to_string(&card.examples)?,
                    card.is_known,
                    card.last_reviewed.as_ref().map(format_timestamp),
                    format_timestamp(&card.created_at),
                    format_timestamp(&card.updated_at),
                ])?;
            }
        }
        tx.commit()?;

        debug!("Inserted {} cards", cards.len());
        Ok(())
    }

    /// Get a card by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: &str) -> Result<Option<Card>> {
        let card = self
            .conn
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                [id],
                Self::row_to_card,
            )
            .optional()?;
        Ok(card)
    }

    /// List every card of one owner, newest-created first.
    ///
    /// Cards created at the same instant come back in reverse insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE owner_id = ?1 \
             ORDER BY created_at DESC, rowid DESC"
        ))?;

        let cards = stmt
            .query_map([owner_id], Self::row_to_card)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(cards)
    }

    /// Overwrite the mutable columns of a stored card.
    ///
    /// `id`, `owner_id` and `created_at` are never touched.
    /// Returns `true` if a card was updated, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update(&self, card: &Card) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE cards
            SET word = ?2, translation = ?3, examples = ?4, is_known = ?5,
                last_reviewed = ?6, updated_at = ?7
            WHERE id = ?1
            ",
            params![
                card.id,
                card.word,
                card.translation,
                serde_json::to_string(&card.examples)?,
                card.is_known,
                card.last_reviewed.as_ref().map(format_timestamp),
                format_timestamp(&card.updated_at),
            ],
        )?;

        debug!("Updated card {} ({} rows)", card.id, affected);
        Ok(affected > 0)
    }

    /// Delete a card by id.
    ///
    /// Returns `true` if a card was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM cards WHERE id = ?1", [id])?;
        debug!("Deleted card {} ({} rows)", id, affected);
        Ok(affected > 0)
    }

    /// Get statistics for one owner's deck.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self, owner_id: &str) -> Result<DeckStats> {
        let (total, known, oldest, newest): (i64, i64, Option<String>, Option<String>) =
            self.conn.query_row(
                r"
                SELECT COUNT(*), COALESCE(SUM(is_known), 0), MIN(created_at), MAX(created_at)
                FROM cards WHERE owner_id = ?1
                ",
                [owner_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        let parse = |value: Option<String>| {
            let value = value?;
            match DateTime::parse_from_rfc3339(&value) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(e) => {
                    warn!("Ignoring unparseable created_at {:?}: {}", value, e);
                    None
                }
            }
        };

        Ok(DeckStats {
            owner_id: owner_id.to_string(),
            total,
            known,
            unknown: total - known,
            oldest_card: parse(oldest),
            newest_card: parse(newest),
        })
    }

    /// Convert a database row to a Card struct.
    fn row_to_card(row: &rusqlite::Row) -> rusqlite::Result<Card> {
        let examples_json: String = row.get(4)?;
        let examples: Vec<Example> = serde_json::from_str(&examples_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
        let last_reviewed: Option<String> = row.get(6)?;

        Ok(Card {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            word: row.get(2)?,
            translation: row.get(3)?,
            examples,
            is_known: row.get(5)?,
            last_reviewed: last_reviewed
                .map(|s| parse_timestamp(6, &s))
                .transpose()?,
            created_at: parse_timestamp(7, &row.get::<_, String>(7)?)?,
            updated_at: parse_timestamp(8, &row.get::<_, String>(8)?)?,
        })
    }
}

/// Format a timestamp so that lexical order matches chronological order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Statistics about one owner's deck.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    /// Owner the statistics belong to.
    pub owner_id: String,
    /// Total number of cards.
    pub total: i64,
    /// Cards marked known.
    pub known: i64,
    /// Cards not yet known.
    pub unknown: i64,
    /// Creation time of the oldest card.
    pub oldest_card: Option<DateTime<Utc>>,
    /// Creation time of the newest card.
    pub newest_card: Option<DateTime<Utc>>,
}
