//! Applies roster update batches in feed order.
//!
//! Work items within a batch run concurrently. A batch is acknowledged only
//! when every one of its items succeeded; otherwise it stays pending and is
//! picked up again on the next cycle.

use std::sync::Arc;

use chrono::NaiveDate;
use diamondline_cards::application::ports::RosterUpdateFeed;
use diamondline_cards::domain::roster::RosterUpdate;
use diamondline_cards::domain::values::SeasonYear;
use diamondline_core::cancel::CancellationToken;
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::applier::{ApplyOutcome, UpdateApplier};
use crate::classifier;
use crate::error::{CardFailure, ReconcileError};

/// Summary of one acknowledged batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub date: NaiveDate,
    pub rating_changes: usize,
    pub position_changes: usize,
    pub new_players: usize,
    /// Work items that issued an update.
    pub applied: usize,
    /// Work items the cards already reflected.
    pub already_applied: usize,
    pub created: usize,
    pub already_tracked: usize,
    pub skipped: usize,
}

impl BatchResult {
    fn new(batch: &RosterUpdate) -> Self {
        Self {
            date: batch.date,
            rating_changes: batch.rating_changes.len(),
            position_changes: batch.position_changes.len(),
            new_players: batch.new_players.len(),
            applied: 0,
            already_applied: 0,
            created: 0,
            already_tracked: 0,
            skipped: 0,
        }
    }

    fn record(&mut self, outcome: ApplyOutcome) {
        match outcome {
            ApplyOutcome::Applied => self.applied += 1,
            ApplyOutcome::AlreadyApplied => self.already_applied += 1,
            ApplyOutcome::Created => self.created += 1,
            ApplyOutcome::AlreadyTracked => self.already_tracked += 1,
            ApplyOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Drives roster update batches from the feed through the applier.
pub struct RosterBatchCoordinator {
    feed: Arc<dyn RosterUpdateFeed>,
    applier: UpdateApplier,
    // Held for a whole run so overlapping runs never apply a batch twice.
    run_lock: Mutex<()>,
}

impl RosterBatchCoordinator {
    #[must_use]
    pub fn new(feed: Arc<dyn RosterUpdateFeed>, applier: UpdateApplier) -> Self {
        Self {
            feed,
            applier,
            run_lock: Mutex::new(()),
        }
    }

    /// Applies every pending batch, oldest first, one at a time.
    ///
    /// Stops at the first batch that fails. Batches before it stay
    /// acknowledged. Runs are serialized: a second caller waits for the
    /// first to finish and then only sees what is still pending.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failed batch, or a feed error.
    pub async fn sync_all(
        &self,
        season: SeasonYear,
        cancel: &CancellationToken,
    ) -> Result<Vec<BatchResult>, ReconcileError> {
        let _running = cancel.run(self.run_lock.lock()).await?;
        let batches = cancel.run(self.feed.pending_batches(season)).await??;
        info!(%season, pending = batches.len(), "syncing roster updates");

        let mut results = Vec::with_capacity(batches.len());
        for batch in &batches {
            results.push(self.sync_one(season, batch, cancel).await?);
        }
        Ok(results)
    }

    /// Applies one batch and acknowledges it if every work item succeeded.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::Cancelled` if any work item was cancelled,
    /// otherwise `ReconcileError::BatchInterrupted` carrying every failed
    /// work item. In both cases the batch is not acknowledged.
    async fn sync_one(
        &self,
        season: SeasonYear,
        batch: &RosterUpdate,
        cancel: &CancellationToken,
    ) -> Result<BatchResult, ReconcileError> {
        let items = classifier::plan(batch);

        let outcomes = join_all(items.iter().map(|item| async move {
            (item, self.applier.apply(season, item, cancel).await)
        }))
        .await;

        let mut result = BatchResult::new(batch);
        let mut failures = Vec::new();
        let mut cancelled = false;
        for (item, outcome) in outcomes {
            match outcome {
                Ok(outcome) => result.record(outcome),
                Err(ReconcileError::Cancelled) => cancelled = true,
                Err(error) => failures.push(CardFailure {
                    card_external_id: item.card_external_id(),
                    error,
                }),
            }
        }

        if cancelled {
            return Err(ReconcileError::Cancelled);
        }
        if !failures.is_empty() {
            let error = ReconcileError::BatchInterrupted {
                date: batch.date,
                failures,
            };
            error!(%season, batch_date = %batch.date, %error, "roster update aborted");
            return Err(error);
        }

        cancel.run(self.feed.acknowledge(batch)).await??;
        info!(
            %season,
            batch_date = %batch.date,
            applied = result.applied,
            already_applied = result.already_applied,
            created = result.created,
            "roster update applied"
        );
        Ok(result)
    }
}
