//! Process-local card store.

use std::collections::HashMap;

use async_trait::async_trait;
use diamondline_cards::domain::aggregates::PlayerCard;
use diamondline_cards::domain::repository::CardRepository;
use diamondline_cards::domain::values::{CardExternalId, SeasonYear};
use diamondline_core::error::DomainError;
use tokio::sync::RwLock;

/// Holds tracked cards in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryCardRepository {
    cards: RwLock<HashMap<(SeasonYear, CardExternalId), PlayerCard>>,
}

#[async_trait]
impl CardRepository for MemoryCardRepository {
    async fn get_by_external_id(
        &self,
        season: SeasonYear,
        card_external_id: CardExternalId,
    ) -> Result<Option<PlayerCard>, DomainError> {
        Ok(self
            .cards
            .read()
            .await
            .get(&(season, card_external_id))
            .cloned())
    }

    async fn add(&self, card: PlayerCard) -> Result<(), DomainError> {
        let mut cards = self.cards.write().await;
        let key = (card.season(), card.external_id());
        if cards.contains_key(&key) {
            return Err(DomainError::AlreadyExists(card.external_id().as_uuid()));
        }
        cards.insert(key, card);
        Ok(())
    }

    async fn update(&self, card: PlayerCard) -> Result<(), DomainError> {
        let mut cards = self.cards.write().await;
        let key = (card.season(), card.external_id());
        match cards.get_mut(&key) {
            Some(stored) => {
                *stored = card;
                Ok(())
            }
            None => Err(DomainError::AggregateNotFound(card.external_id().as_uuid())),
        }
    }
}
