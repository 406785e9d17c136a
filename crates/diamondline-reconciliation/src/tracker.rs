//! Seeds the card context with every card on the active roster.

use std::sync::Arc;

use diamondline_cards::application::dispatch::Dispatcher;
use diamondline_cards::application::ports::{CardCatalog, CatalogError};
use diamondline_cards::application::query_handlers::GetCardByExternalId;
use diamondline_cards::domain::commands::CreateCard;
use diamondline_cards::domain::snapshot::ExternalCardSnapshot;
use diamondline_cards::domain::values::{CardExternalId, SeasonYear};
use diamondline_core::cancel::CancellationToken;
use diamondline_core::error::DomainError;
use futures::future::join_all;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ReconcileError;

/// Outcome of tracking a season's roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackResult {
    /// Cards created by this run.
    pub created: Vec<CardExternalId>,
    /// Number of cards that were already tracked.
    pub existing: usize,
}

/// Creates a card for every catalog entry the domain does not know yet.
pub struct CardTracker {
    catalog: Arc<dyn CardCatalog>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl CardTracker {
    #[must_use]
    pub fn new(catalog: Arc<dyn CardCatalog>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            catalog,
            dispatcher,
        }
    }

    /// Tracks every card on the season's active roster.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::NoCardsFound` if the roster is empty,
    /// `ReconcileError::Cancelled` if the signal is raised, or the first
    /// collaborator error.
    pub async fn track_cards(
        &self,
        season: SeasonYear,
        cancel: &CancellationToken,
    ) -> Result<TrackResult, ReconcileError> {
        let snapshots = match cancel
            .run(self.catalog.get_active_roster_snapshots(season))
            .await?
        {
            Ok(snapshots) if !snapshots.is_empty() => snapshots,
            Ok(_) | Err(CatalogError::Empty(_)) => {
                return Err(ReconcileError::NoCardsFound { season });
            }
            Err(error) => return Err(error.into()),
        };

        let outcomes = join_all(
            snapshots
                .into_iter()
                .map(|snapshot| self.track_card(season, snapshot, cancel)),
        )
        .await;

        if outcomes
            .iter()
            .any(|outcome| matches!(outcome, Err(ReconcileError::Cancelled)))
        {
            return Err(ReconcileError::Cancelled);
        }

        let mut result = TrackResult::default();
        for outcome in outcomes {
            match outcome? {
                Some(card_external_id) => result.created.push(card_external_id),
                None => result.existing += 1,
            }
        }
        result.created.sort();

        info!(
            %season,
            created = result.created.len(),
            existing = result.existing,
            "roster tracked"
        );
        Ok(result)
    }

    async fn track_card(
        &self,
        season: SeasonYear,
        snapshot: ExternalCardSnapshot,
        cancel: &CancellationToken,
    ) -> Result<Option<CardExternalId>, ReconcileError> {
        let card_external_id = snapshot.external_id;
        let query = GetCardByExternalId {
            season,
            card_external_id,
        };
        if cancel.run(self.dispatcher.query(query)).await??.is_some() {
            return Ok(None);
        }

        let command = CreateCard {
            correlation_id: Uuid::new_v4(),
            snapshot,
        };
        match cancel.run(self.dispatcher.command(command.into())).await? {
            Ok(()) => Ok(Some(card_external_id)),
            Err(DomainError::AlreadyExists(_)) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}
