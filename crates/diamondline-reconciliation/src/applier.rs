//! Applies one work item to the card context.

use std::sync::Arc;

use diamondline_cards::application::dispatch::Dispatcher;
use diamondline_cards::application::ports::{CardCatalog, CatalogError};
use diamondline_cards::application::query_handlers::GetCardByExternalId;
use diamondline_cards::domain::commands::{CreateCard, UpdateCard};
use diamondline_cards::domain::roster::{PlayerAddition, PlayerPositionChange, PlayerRatingChange};
use diamondline_cards::domain::values::{CardExternalId, SeasonYear};
use diamondline_core::cancel::CancellationToken;
use diamondline_core::error::DomainError;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::classifier::WorkItem;
use crate::config::ReconcileConfig;
use crate::error::{ChangeKind, ReconcileError};

/// What applying a work item did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// An update command was issued.
    Applied,
    /// The card already reflected every change; nothing was issued.
    AlreadyApplied,
    /// A new card was created.
    Created,
    /// The added card was already tracked.
    AlreadyTracked,
    /// The item carried nothing that could be applied.
    Skipped,
}

/// Loads the targeted card, checks whether the change is already reflected,
/// and issues at most one command.
pub struct UpdateApplier {
    catalog: Arc<dyn CardCatalog>,
    dispatcher: Arc<dyn Dispatcher>,
    config: ReconcileConfig,
}

impl UpdateApplier {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CardCatalog>,
        dispatcher: Arc<dyn Dispatcher>,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            catalog,
            dispatcher,
            config,
        }
    }

    /// Applies `item` for `season`.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::CardNotFoundForUpdate` if a change targets an
    /// untracked card, `ReconcileError::ExternalCardMissingForAddition` if an
    /// added card is unknown to the catalog, `ReconcileError::Cancelled` if
    /// the signal is raised while waiting, and wraps any collaborator error.
    pub async fn apply(
        &self,
        season: SeasonYear,
        item: &WorkItem,
        cancel: &CancellationToken,
    ) -> Result<ApplyOutcome, ReconcileError> {
        match item {
            WorkItem::Rating(rating) => {
                self.apply_change(season, rating.card_external_id, Some(rating), None, cancel)
                    .await
            }
            WorkItem::Position(position) => {
                self.apply_change(season, position.card_external_id, None, Some(position), cancel)
                    .await
            }
            WorkItem::RatingAndPosition { rating, position } => {
                self.apply_change(
                    season,
                    rating.card_external_id,
                    Some(rating),
                    Some(position),
                    cancel,
                )
                .await
            }
            WorkItem::Addition(addition) => self.apply_addition(season, addition, cancel).await,
        }
    }

    async fn apply_change(
        &self,
        season: SeasonYear,
        card_external_id: CardExternalId,
        rating: Option<&PlayerRatingChange>,
        position: Option<&PlayerPositionChange>,
        cancel: &CancellationToken,
    ) -> Result<ApplyOutcome, ReconcileError> {
        let kind = match (rating, position) {
            (Some(_), Some(_)) => ChangeKind::RatingAndPosition,
            (Some(_), None) => ChangeKind::Rating,
            _ => ChangeKind::Position,
        };

        let card = cancel
            .run(self.dispatcher.query(GetCardByExternalId {
                season,
                card_external_id,
            }))
            .await??
            .ok_or(ReconcileError::CardNotFoundForUpdate {
                card_external_id,
                kind,
            })?;

        let pending_rating = rating.filter(|change| !change.is_applied(&card));
        let pending_position = position.filter(|change| !change.is_applied(&card));
        if pending_rating.is_none() && pending_position.is_none() {
            debug!(%card_external_id, %kind, "change already applied");
            return Ok(ApplyOutcome::AlreadyApplied);
        }

        let mut command =
            UpdateCard::new(season, card_external_id, self.config.season_start(season)?);
        if let Some(change) = pending_rating {
            let snapshot = cancel
                .run(self.catalog.get_snapshot(season, card_external_id))
                .await??;
            command.snapshot = Some(snapshot);
            command.rating_change = Some(change.clone());
        }
        command.position_change = pending_position.cloned();

        debug!(
            %card_external_id,
            %kind,
            correlation_id = %command.correlation_id,
            "updating card"
        );
        cancel.run(self.dispatcher.command(command.into())).await??;
        Ok(ApplyOutcome::Applied)
    }

    async fn apply_addition(
        &self,
        season: SeasonYear,
        addition: &PlayerAddition,
        cancel: &CancellationToken,
    ) -> Result<ApplyOutcome, ReconcileError> {
        let Some(card_external_id) = addition.card_external_id else {
            warn!(
                player_name = %addition.player_name,
                "new player has no card identity, skipping"
            );
            return Ok(ApplyOutcome::Skipped);
        };

        let snapshot = match cancel
            .run(self.catalog.get_snapshot(season, card_external_id))
            .await?
        {
            Ok(snapshot) => snapshot,
            Err(CatalogError::NotFound { .. }) => {
                return Err(ReconcileError::ExternalCardMissingForAddition {
                    card_external_id,
                    player_name: addition.player_name.clone(),
                });
            }
            Err(error) => return Err(error.into()),
        };

        let command = CreateCard {
            correlation_id: Uuid::new_v4(),
            snapshot,
        };
        match cancel.run(self.dispatcher.command(command.into())).await? {
            Ok(()) => {
                debug!(%card_external_id, "created card for new player");
                Ok(ApplyOutcome::Created)
            }
            Err(DomainError::AlreadyExists(_)) => Ok(ApplyOutcome::AlreadyTracked),
            Err(error) => Err(error.into()),
        }
    }
}
