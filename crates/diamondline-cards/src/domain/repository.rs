//! Card repository abstraction.

use async_trait::async_trait;
use diamondline_core::error::DomainError;

use super::aggregates::PlayerCard;
use super::values::{CardExternalId, SeasonYear};

/// Persistence port for tracked cards, keyed by season and external ID.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Loads a card, or `None` if it is not tracked.
    async fn get_by_external_id(
        &self,
        season: SeasonYear,
        card_external_id: CardExternalId,
    ) -> Result<Option<PlayerCard>, DomainError>;

    /// Stores a new card.
    ///
    /// Implementations return `DomainError::AlreadyExists` if the card is
    /// already tracked.
    async fn add(&self, card: PlayerCard) -> Result<(), DomainError>;

    /// Replaces a tracked card.
    ///
    /// Implementations return `DomainError::AggregateNotFound` if the card is
    /// not tracked.
    async fn update(&self, card: PlayerCard) -> Result<(), DomainError>;
}
