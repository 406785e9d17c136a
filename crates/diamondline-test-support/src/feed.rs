//! Test feed: an in-memory `RosterUpdateFeed`.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use diamondline_cards::application::ports::{FeedError, RosterUpdateFeed};
use diamondline_cards::domain::roster::RosterUpdate;
use diamondline_cards::domain::values::SeasonYear;

/// A roster update feed serving fixed batches. Acknowledged batches are not
/// returned again.
#[derive(Debug, Default)]
pub struct InMemoryRosterUpdateFeed {
    batches: Vec<RosterUpdate>,
    acknowledged: Mutex<Vec<NaiveDate>>,
}

impl InMemoryRosterUpdateFeed {
    /// Creates a feed serving `batches` in date order.
    #[must_use]
    pub fn with_batches(mut batches: Vec<RosterUpdate>) -> Self {
        batches.sort_by_key(|batch| batch.date);
        Self {
            batches,
            acknowledged: Mutex::new(Vec::new()),
        }
    }

    /// Returns the dates of acknowledged batches, in acknowledgement order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn acknowledged(&self) -> Vec<NaiveDate> {
        self.acknowledged.lock().unwrap().clone()
    }
}

#[async_trait]
impl RosterUpdateFeed for InMemoryRosterUpdateFeed {
    async fn pending_batches(&self, _season: SeasonYear) -> Result<Vec<RosterUpdate>, FeedError> {
        let acknowledged = self.acknowledged.lock().unwrap();
        Ok(self
            .batches
            .iter()
            .filter(|batch| !acknowledged.contains(&batch.date))
            .cloned()
            .collect())
    }

    async fn acknowledge(&self, batch: &RosterUpdate) -> Result<(), FeedError> {
        self.acknowledged.lock().unwrap().push(batch.date);
        Ok(())
    }
}
