//! Ports to the external card catalog and roster update feed.
//!
//! Both sources are read-only from the engine's point of view. The feed only
//! learns that a batch has been consumed through `acknowledge`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::roster::RosterUpdate;
use crate::domain::snapshot::ExternalCardSnapshot;
use crate::domain::values::{CardExternalId, SeasonYear};

/// Errors raised by a `CardCatalog`.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no card with the given identity.
    #[error("card {card_external_id} not found in the {season} catalog")]
    NotFound {
        season: SeasonYear,
        card_external_id: CardExternalId,
    },

    /// The catalog returned no active roster for the season.
    #[error("the {0} catalog has no active roster")]
    Empty(SeasonYear),

    /// The catalog could not be reached or returned garbage.
    #[error("card catalog unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a `RosterUpdateFeed`.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed could not be reached or returned garbage.
    #[error("roster update feed unavailable: {0}")]
    Unavailable(String),
}

/// Source of the current state of external cards.
#[async_trait]
pub trait CardCatalog: Send + Sync {
    /// Fetches one card as the catalog currently sees it.
    async fn get_snapshot(
        &self,
        season: SeasonYear,
        card_external_id: CardExternalId,
    ) -> Result<ExternalCardSnapshot, CatalogError>;

    /// Fetches every card on the season's active roster.
    async fn get_active_roster_snapshots(
        &self,
        season: SeasonYear,
    ) -> Result<Vec<ExternalCardSnapshot>, CatalogError>;
}

/// Source of roster update batches.
#[async_trait]
pub trait RosterUpdateFeed: Send + Sync {
    /// Returns batches not yet acknowledged, oldest first.
    async fn pending_batches(&self, season: SeasonYear) -> Result<Vec<RosterUpdate>, FeedError>;

    /// Marks a batch as consumed. It is not returned again.
    async fn acknowledge(&self, batch: &RosterUpdate) -> Result<(), FeedError>;
}
