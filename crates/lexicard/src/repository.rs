//! Card repository: the CRUD contract over the store.
//!
//! The repository owns the card lifecycle rules: input validation, id and
//! timestamp assignment, and turning "no such row" into [`Error::NotFound`].
//! [`CardRepository`] is the seam the HTTP layer and the CLI program against.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::card::{Card, CardPatch, NewCard};
use crate::error::{Error, Result};
use crate::storage::{DeckStats, Storage};

/// CRUD operations over one card collection, scoped by owner.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// All cards of `owner_id`, newest-created first.
    async fn list(&self, owner_id: &str) -> Result<Vec<Card>>;

    /// Validate and store a batch of new cards for `owner_id`.
    ///
    /// The whole batch is rejected if any entry is invalid. Returns the stored
    /// records in input order.
    async fn create(&self, owner_id: &str, cards: Vec<NewCard>) -> Result<Vec<Card>>;

    /// Merge `patch` into the card with the given id and return the result.
    ///
    /// `lastReviewed` is stamped with the current time unless the patch
    /// carries one, even for an empty patch.
    async fn update(&self, id: &str, patch: CardPatch) -> Result<Card>;

    /// Remove the card with the given id.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Known/unknown counts for `owner_id`.
    async fn stats(&self, owner_id: &str) -> Result<DeckStats>;
}

/// [`CardRepository`] backed by a [`Storage`] handle.
#[derive(Debug, Clone)]
pub struct SqliteCardRepository {
    storage: Arc<Mutex<Storage>>,
}

impl SqliteCardRepository {
    /// Wrap an open storage.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
        }
    }

    /// Repository over a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Storage::open_in_memory()?))
    }
}

/// Current time at the precision the store keeps.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[async_trait]
impl CardRepository for SqliteCardRepository {
    async fn list(&self, owner_id: &str) -> Result<Vec<Card>> {
        let storage = self.storage.lock().await;
        let cards = storage.list_by_owner(owner_id)?;
        debug!("Listed {} cards for owner {}", cards.len(), owner_id);
        Ok(cards)
    }

    async fn create(&self, owner_id: &str, cards: Vec<NewCard>) -> Result<Vec<Card>> {
        let created_at = now();
        let cards = cards
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                Card::create(owner_id, input, created_at).map_err(|err| match err {
                    Error::Validation { message } => {
                        Error::validation(format!("card {index}: {message}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.storage.lock().await.insert_batch(&cards)?;
        info!("Created {} cards for owner {}", cards.len(), owner_id);
        Ok(cards)
    }

    async fn update(&self, id: &str, patch: CardPatch) -> Result<Card> {
        let storage = self.storage.lock().await;
        let mut card = storage.get(id)?.ok_or_else(|| Error::not_found(id))?;

        card.apply(patch, now())?;
        if !storage.update(&card)? {
            return Err(Error::not_found(id));
        }

        // Re-read so explicit timestamps come back at stored precision.
        storage.get(id)?.ok_or_else(|| Error::not_found(id))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if self.storage.lock().await.delete(id)? {
            debug!("Deleted card {}", id);
            Ok(())
        } else {
            Err(Error::not_found(id))
        }
    }

    async fn stats(&self, owner_id: &str) -> Result<DeckStats> {
        self.storage.lock().await.stats(owner_id)
    }
}
