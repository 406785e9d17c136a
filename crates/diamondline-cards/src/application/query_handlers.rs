//! Query handlers for the card context.

use diamondline_core::error::DomainError;
use serde::Serialize;

use crate::domain::aggregates::PlayerCard;
use crate::domain::attributes::AttributeSet;
use crate::domain::periods::HistoricalRatingPeriod;
use crate::domain::repository::CardRepository;
use crate::domain::values::{CardExternalId, CardName, OverallRating, Position, SeasonYear};

/// Query for one tracked card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetCardByExternalId {
    pub season: SeasonYear,
    pub card_external_id: CardExternalId,
}

/// Read-only view of a player card.
#[derive(Debug, Serialize)]
pub struct PlayerCardView {
    pub season: SeasonYear,
    pub card_external_id: CardExternalId,
    pub name: CardName,
    pub position: Position,
    pub overall_rating: OverallRating,
    pub attributes: AttributeSet,
    pub is_boosted: bool,
    pub has_temporary_rating: bool,
    /// Rating periods ordered by start date.
    pub historical_ratings: Vec<HistoricalRatingPeriod>,
}

impl From<&PlayerCard> for PlayerCardView {
    fn from(card: &PlayerCard) -> Self {
        Self {
            season: card.season(),
            card_external_id: card.external_id(),
            name: card.name().clone(),
            position: card.position(),
            overall_rating: card.overall_rating(),
            attributes: card.attributes().clone(),
            is_boosted: card.is_boosted(),
            has_temporary_rating: card.has_temporary_rating(),
            historical_ratings: card.historical_ratings().into_iter().cloned().collect(),
        }
    }
}

/// Retrieves a card by season and external ID.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn get_card_by_external_id(
    query: GetCardByExternalId,
    repo: &dyn CardRepository,
) -> Result<Option<PlayerCard>, DomainError> {
    repo.get_by_external_id(query.season, query.card_external_id)
        .await
}
