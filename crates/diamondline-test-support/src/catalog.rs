//! Test catalog: a scriptable `CardCatalog`.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use diamondline_cards::application::ports::{CardCatalog, CatalogError};
use diamondline_cards::domain::snapshot::ExternalCardSnapshot;
use diamondline_cards::domain::values::{CardExternalId, SeasonYear};

/// A card catalog serving snapshots from memory.
///
/// Individual cards can be made to fail, to answer late or to hang forever,
/// which lets tests exercise partial batch failures, overlapping runs and
/// cancellation.
#[derive(Debug, Default)]
pub struct StubCardCatalog {
    snapshots: Mutex<HashMap<CardExternalId, ExternalCardSnapshot>>,
    failing: Mutex<HashSet<CardExternalId>>,
    hanging: Mutex<HashSet<CardExternalId>>,
    slow: Mutex<HashSet<CardExternalId>>,
    snapshot_calls: AtomicUsize,
}

impl StubCardCatalog {
    /// Creates a catalog serving `snapshots`.
    #[must_use]
    pub fn with_snapshots(snapshots: impl IntoIterator<Item = ExternalCardSnapshot>) -> Self {
        let catalog = Self::default();
        for snapshot in snapshots {
            catalog.set_snapshot(snapshot);
        }
        catalog
    }

    /// Adds or replaces a snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn set_snapshot(&self, snapshot: ExternalCardSnapshot) {
        self.snapshots
            .lock()
            .unwrap()
            .insert(snapshot.external_id, snapshot);
    }

    /// Makes every lookup of `card_external_id` fail as unavailable.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_for(&self, card_external_id: CardExternalId) {
        self.failing.lock().unwrap().insert(card_external_id);
    }

    /// Undoes `fail_for`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn recover(&self, card_external_id: CardExternalId) {
        self.failing.lock().unwrap().remove(&card_external_id);
    }

    /// Makes every lookup of `card_external_id` wait forever.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn hang_for(&self, card_external_id: CardExternalId) {
        self.hanging.lock().unwrap().insert(card_external_id);
    }

    /// Makes every lookup of `card_external_id` yield to other tasks before
    /// answering.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn slow_for(&self, card_external_id: CardExternalId) {
        self.slow.lock().unwrap().insert(card_external_id);
    }

    /// Returns how many single-card lookups were made.
    #[must_use]
    pub fn snapshot_calls(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardCatalog for StubCardCatalog {
    async fn get_snapshot(
        &self,
        season: SeasonYear,
        card_external_id: CardExternalId,
    ) -> Result<ExternalCardSnapshot, CatalogError> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        let hangs = self.hanging.lock().unwrap().contains(&card_external_id);
        if hangs {
            std::future::pending::<()>().await;
        }
        let slow = self.slow.lock().unwrap().contains(&card_external_id);
        if slow {
            tokio::task::yield_now().await;
        }
        let fails = self.failing.lock().unwrap().contains(&card_external_id);
        if fails {
            return Err(CatalogError::Unavailable(format!(
                "lookup of {card_external_id} timed out"
            )));
        }
        self.snapshots
            .lock()
            .unwrap()
            .get(&card_external_id)
            .filter(|snapshot| snapshot.season == season)
            .cloned()
            .ok_or(CatalogError::NotFound {
                season,
                card_external_id,
            })
    }

    async fn get_active_roster_snapshots(
        &self,
        season: SeasonYear,
    ) -> Result<Vec<ExternalCardSnapshot>, CatalogError> {
        let mut snapshots: Vec<ExternalCardSnapshot> = self
            .snapshots
            .lock()
            .unwrap()
            .values()
            .filter(|snapshot| snapshot.season == season)
            .cloned()
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.external_id);
        Ok(snapshots)
    }
}
