//! Test repositories: `CardRepository` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use diamondline_cards::domain::aggregates::PlayerCard;
use diamondline_cards::domain::repository::CardRepository;
use diamondline_cards::domain::values::{CardExternalId, SeasonYear};
use diamondline_core::error::DomainError;

/// A card repository backed by a map. Counts successful updates so tests can
/// assert how many save cycles a card went through.
#[derive(Debug, Default)]
pub struct InMemoryCardRepository {
    cards: Mutex<HashMap<(SeasonYear, CardExternalId), PlayerCard>>,
    updates: AtomicUsize,
}

impl InMemoryCardRepository {
    /// Creates a repository seeded with `cards`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_cards(cards: impl IntoIterator<Item = PlayerCard>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.cards.lock().unwrap();
            for card in cards {
                map.insert((card.season(), card.external_id()), card);
            }
        }
        repo
    }

    /// Returns a copy of a stored card.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn card(&self, season: SeasonYear, card_external_id: CardExternalId) -> Option<PlayerCard> {
        self.cards
            .lock()
            .unwrap()
            .get(&(season, card_external_id))
            .cloned()
    }

    /// Returns the number of cards stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.lock().unwrap().len()
    }

    /// Returns `true` if no cards are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns how many times `update` succeeded.
    #[must_use]
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardRepository for InMemoryCardRepository {
    async fn get_by_external_id(
        &self,
        season: SeasonYear,
        card_external_id: CardExternalId,
    ) -> Result<Option<PlayerCard>, DomainError> {
        Ok(self.card(season, card_external_id))
    }

    async fn add(&self, card: PlayerCard) -> Result<(), DomainError> {
        let mut cards = self.cards.lock().unwrap();
        let key = (card.season(), card.external_id());
        if cards.contains_key(&key) {
            return Err(DomainError::AlreadyExists(card.external_id().as_uuid()));
        }
        cards.insert(key, card);
        Ok(())
    }

    async fn update(&self, card: PlayerCard) -> Result<(), DomainError> {
        let mut cards = self.cards.lock().unwrap();
        let key = (card.season(), card.external_id());
        if !cards.contains_key(&key) {
            return Err(DomainError::AggregateNotFound(card.external_id().as_uuid()));
        }
        cards.insert(key, card);
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A card repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingCardRepository;

#[async_trait]
impl CardRepository for FailingCardRepository {
    async fn get_by_external_id(
        &self,
        _season: SeasonYear,
        _card_external_id: CardExternalId,
    ) -> Result<Option<PlayerCard>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn add(&self, _card: PlayerCard) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn update(&self, _card: PlayerCard) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
