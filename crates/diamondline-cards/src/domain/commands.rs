//! Commands for the card context.

use chrono::NaiveDate;
use diamondline_core::command::Command;
use uuid::Uuid;

use super::periods::HistoricalRatingPeriod;
use super::roster::{PlayerPositionChange, PlayerRatingChange};
use super::snapshot::ExternalCardSnapshot;
use super::values::{CardExternalId, SeasonYear};

/// Command to bring a tracked card up to date.
///
/// Every part is optional. A single command may carry a rating change, a
/// position change and reconstructed history for the same card, which the
/// handler applies together in one load/save cycle.
#[derive(Debug, Clone)]
pub struct UpdateCard {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub season: SeasonYear,
    pub card_external_id: CardExternalId,
    /// First day of the season, used when a card has no baseline history.
    pub season_start: NaiveDate,
    /// The catalog's current view of the card.
    pub snapshot: Option<ExternalCardSnapshot>,
    pub rating_change: Option<PlayerRatingChange>,
    pub position_change: Option<PlayerPositionChange>,
    /// Reconstructed periods to record, oldest first.
    pub historical_periods: Vec<HistoricalRatingPeriod>,
}

impl UpdateCard {
    /// Creates an update that changes nothing yet.
    #[must_use]
    pub fn new(
        season: SeasonYear,
        card_external_id: CardExternalId,
        season_start: NaiveDate,
    ) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            season,
            card_external_id,
            season_start,
            snapshot: None,
            rating_change: None,
            position_change: None,
            historical_periods: Vec::new(),
        }
    }
}

impl Command for UpdateCard {
    fn command_type(&self) -> &'static str {
        "cards.update_card"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to start tracking a card from its catalog snapshot.
#[derive(Debug, Clone)]
pub struct CreateCard {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub snapshot: ExternalCardSnapshot,
}

impl Command for CreateCard {
    fn command_type(&self) -> &'static str {
        "cards.create_card"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
