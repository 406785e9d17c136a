//! Entry point for driving shells.

use std::sync::Arc;

use diamondline_cards::application::dispatch::Dispatcher;
use diamondline_cards::application::ports::{CardCatalog, RosterUpdateFeed};
use diamondline_cards::domain::values::SeasonYear;
use diamondline_core::cancel::CancellationToken;
use tracing::instrument;

use crate::applier::UpdateApplier;
use crate::config::ReconcileConfig;
use crate::coordinator::{BatchResult, RosterBatchCoordinator};
use crate::error::ReconcileError;
use crate::history_sync::{HistorySyncDriver, HistorySyncResult};
use crate::tracker::{CardTracker, TrackResult};

/// Wires the engine's components over one set of collaborators.
pub struct ReconciliationService {
    coordinator: RosterBatchCoordinator,
    history: HistorySyncDriver,
    tracker: CardTracker,
}

impl ReconciliationService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CardCatalog>,
        feed: Arc<dyn RosterUpdateFeed>,
        dispatcher: Arc<dyn Dispatcher>,
        config: ReconcileConfig,
    ) -> Self {
        let applier = UpdateApplier::new(Arc::clone(&catalog), Arc::clone(&dispatcher), config);
        Self {
            coordinator: RosterBatchCoordinator::new(Arc::clone(&feed), applier),
            history: HistorySyncDriver::new(
                feed,
                Arc::clone(&catalog),
                Arc::clone(&dispatcher),
                config,
            ),
            tracker: CardTracker::new(catalog, dispatcher),
        }
    }

    /// Applies every pending roster update for `season`, oldest first.
    ///
    /// # Errors
    ///
    /// See [`RosterBatchCoordinator::sync_all`].
    #[instrument(skip(self, cancel))]
    pub async fn sync_roster_updates(
        &self,
        season: SeasonYear,
        cancel: &CancellationToken,
    ) -> Result<Vec<BatchResult>, ReconcileError> {
        self.coordinator.sync_all(season, cancel).await
    }

    /// Rebuilds rating history for cards with pending rating changes.
    ///
    /// # Errors
    ///
    /// See [`HistorySyncDriver::sync_history`].
    #[instrument(skip(self, cancel))]
    pub async fn sync_history(
        &self,
        season: SeasonYear,
        cancel: &CancellationToken,
    ) -> Result<HistorySyncResult, ReconcileError> {
        self.history.sync_history(season, cancel).await
    }

    /// Creates cards for every catalog entry not yet tracked.
    ///
    /// # Errors
    ///
    /// See [`CardTracker::track_cards`].
    #[instrument(skip(self, cancel))]
    pub async fn track_cards(
        &self,
        season: SeasonYear,
        cancel: &CancellationToken,
    ) -> Result<TrackResult, ReconcileError> {
        self.tracker.track_cards(season, cancel).await
    }
}
