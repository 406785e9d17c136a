//! Backfills rating history for every card with pending rating changes.
//!
//! Rating changes are grouped by card across all pending batches. Each card
//! is processed independently: a card that cannot be processed is logged and
//! reported as skipped, and the rest of the sync carries on.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use diamondline_cards::application::dispatch::Dispatcher;
use diamondline_cards::application::ports::{CardCatalog, RosterUpdateFeed};
use diamondline_cards::application::query_handlers::GetCardByExternalId;
use diamondline_cards::domain::commands::UpdateCard;
use diamondline_cards::domain::periods::HistoricalRatingPeriod;
use diamondline_cards::domain::roster::PlayerRatingChange;
use diamondline_cards::domain::values::{CardExternalId, SeasonYear};
use diamondline_core::cancel::CancellationToken;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::ReconcileConfig;
use crate::error::ReconcileError;
use crate::history::{self, Reconstruction};

/// Why a card's history was not rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The card has rating changes but is not tracked yet.
    CardNotFound,
    /// The card is boosted or carries a temporary rating.
    Boosted,
    /// Processing failed; the message describes why.
    Failed(String),
}

/// A card left out of a history sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCard {
    pub card_external_id: CardExternalId,
    pub reason: SkipReason,
}

/// Outcome of a history sync.
#[derive(Debug, Default, Serialize)]
pub struct HistorySyncResult {
    /// Periods appended per card, oldest first.
    pub updated_cards: BTreeMap<CardExternalId, Vec<HistoricalRatingPeriod>>,
    pub skipped: Vec<SkippedCard>,
}

enum CardOutcome {
    Updated(Vec<HistoricalRatingPeriod>),
    Unchanged,
    Skipped(SkipReason),
}

/// Rebuilds rating history for cards named in pending roster updates.
pub struct HistorySyncDriver {
    feed: Arc<dyn RosterUpdateFeed>,
    catalog: Arc<dyn CardCatalog>,
    dispatcher: Arc<dyn Dispatcher>,
    config: ReconcileConfig,
}

impl HistorySyncDriver {
    #[must_use]
    pub fn new(
        feed: Arc<dyn RosterUpdateFeed>,
        catalog: Arc<dyn CardCatalog>,
        dispatcher: Arc<dyn Dispatcher>,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            feed,
            catalog,
            dispatcher,
            config,
        }
    }

    /// Rebuilds the history of every card with pending rating changes.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::Cancelled` if the signal is raised, or an
    /// error if the feed cannot be read. Failures of individual cards are
    /// reported in [`HistorySyncResult::skipped`] instead.
    pub async fn sync_history(
        &self,
        season: SeasonYear,
        cancel: &CancellationToken,
    ) -> Result<HistorySyncResult, ReconcileError> {
        let season_start = self.config.season_start(season)?;
        let batches = cancel.run(self.feed.pending_batches(season)).await??;

        let mut groups: BTreeMap<CardExternalId, Vec<PlayerRatingChange>> = BTreeMap::new();
        for change in batches.into_iter().flat_map(|batch| batch.rating_changes) {
            groups.entry(change.card_external_id).or_default().push(change);
        }
        info!(%season, cards = groups.len(), "syncing rating history");

        let outcomes = join_all(groups.iter().map(|(&card_external_id, changes)| async move {
            let outcome = self
                .sync_card(season, season_start, card_external_id, changes, cancel)
                .await;
            (card_external_id, outcome)
        }))
        .await;

        let mut result = HistorySyncResult::default();
        let mut cancelled = false;
        for (card_external_id, outcome) in outcomes {
            match outcome {
                Ok(CardOutcome::Updated(periods)) => {
                    result.updated_cards.insert(card_external_id, periods);
                }
                Ok(CardOutcome::Unchanged) => {}
                Ok(CardOutcome::Skipped(reason)) => result.skipped.push(SkippedCard {
                    card_external_id,
                    reason,
                }),
                Err(ReconcileError::Cancelled) => cancelled = true,
                Err(error) => {
                    error!(%card_external_id, %error, "could not rebuild rating history");
                    result.skipped.push(SkippedCard {
                        card_external_id,
                        reason: SkipReason::Failed(error.to_string()),
                    });
                }
            }
        }
        if cancelled {
            return Err(ReconcileError::Cancelled);
        }

        info!(
            %season,
            updated = result.updated_cards.len(),
            skipped = result.skipped.len(),
            "rating history synced"
        );
        Ok(result)
    }

    async fn sync_card(
        &self,
        season: SeasonYear,
        season_start: NaiveDate,
        card_external_id: CardExternalId,
        changes: &[PlayerRatingChange],
        cancel: &CancellationToken,
    ) -> Result<CardOutcome, ReconcileError> {
        let query = GetCardByExternalId {
            season,
            card_external_id,
        };
        let Some(card) = cancel.run(self.dispatcher.query(query)).await?? else {
            warn!(
                %card_external_id,
                "found rating changes for a card that is not tracked, skipping"
            );
            return Ok(CardOutcome::Skipped(SkipReason::CardNotFound));
        };

        let snapshot = cancel
            .run(self.catalog.get_snapshot(season, card_external_id))
            .await??;

        let periods = match history::reconstruct(&card, changes, &snapshot, season_start)? {
            Reconstruction::Boosted => {
                debug!(%card_external_id, "card is boosted, deferring history");
                return Ok(CardOutcome::Skipped(SkipReason::Boosted));
            }
            Reconstruction::NoOp => return Ok(CardOutcome::Unchanged),
            Reconstruction::Appended(periods) => periods,
        };

        let mut command = UpdateCard::new(season, card_external_id, season_start);
        command.rating_change = changes.iter().max_by_key(|change| change.date).cloned();
        command.snapshot = Some(snapshot);
        command.historical_periods = periods.clone();
        cancel.run(self.dispatcher.command(command.into())).await??;

        info!(
            %card_external_id,
            periods = periods.len(),
            "rating history rebuilt"
        );
        Ok(CardOutcome::Updated(periods))
    }
}
