//! Roster update feed read from `roster_updates.json`.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use diamondline_cards::application::ports::{FeedError, RosterUpdateFeed};
use diamondline_cards::domain::roster::RosterUpdate;
use diamondline_cards::domain::values::SeasonYear;

use super::read_json_list;

/// Serves batches from `{data_dir}/{season}/roster_updates.json`.
///
/// Acknowledged batches are remembered by date for the life of the process.
#[derive(Debug)]
pub struct FileRosterUpdateFeed {
    data_dir: PathBuf,
    acknowledged: Mutex<HashSet<NaiveDate>>,
}

impl FileRosterUpdateFeed {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            acknowledged: Mutex::new(HashSet::new()),
        }
    }

    fn is_acknowledged(&self, date: NaiveDate) -> Result<bool, FeedError> {
        self.acknowledged
            .lock()
            .map(|acknowledged| acknowledged.contains(&date))
            .map_err(|e| FeedError::Unavailable(format!("acknowledgement cache poisoned: {e}")))
    }
}

#[async_trait]
impl RosterUpdateFeed for FileRosterUpdateFeed {
    async fn pending_batches(&self, season: SeasonYear) -> Result<Vec<RosterUpdate>, FeedError> {
        let path = self
            .data_dir
            .join(season.to_string())
            .join("roster_updates.json");
        let mut batches: Vec<RosterUpdate> = read_json_list(&path)
            .await
            .map_err(FeedError::Unavailable)?;
        batches.sort_by_key(|batch| batch.date);

        let mut pending = Vec::with_capacity(batches.len());
        for batch in batches {
            if !self.is_acknowledged(batch.date)? {
                pending.push(batch);
            }
        }
        Ok(pending)
    }

    async fn acknowledge(&self, batch: &RosterUpdate) -> Result<(), FeedError> {
        self.acknowledged
            .lock()
            .map_err(|e| FeedError::Unavailable(format!("acknowledgement cache poisoned: {e}")))?
            .insert(batch.date);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use diamondline_test_support::fixtures::{SEASON, day, roster_update};

    use super::*;

    #[tokio::test]
    async fn test_pending_batches_are_oldest_first_and_skip_acknowledged() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let season_dir = dir.path().join(SEASON.to_string());
        std::fs::create_dir_all(&season_dir).unwrap();
        let batches = vec![
            roster_update(day(5, 20), vec![], vec![], vec![]),
            roster_update(day(4, 7), vec![], vec![], vec![]),
        ];
        std::fs::write(
            season_dir.join("roster_updates.json"),
            serde_json::to_vec(&batches).unwrap(),
        )
        .unwrap();
        let feed = FileRosterUpdateFeed::new(dir.path());

        // Act
        let first = feed.pending_batches(SEASON).await.unwrap();
        feed.acknowledge(&first[0]).await.unwrap();
        let second = feed.pending_batches(SEASON).await.unwrap();

        // Assert
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].date, day(4, 7));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].date, day(5, 20));
    }

    #[tokio::test]
    async fn test_missing_file_has_no_pending_batches() {
        let dir = tempfile::tempdir().unwrap();
        let feed = FileRosterUpdateFeed::new(dir.path());

        let pending = feed.pending_batches(SEASON).await.unwrap();

        assert!(pending.is_empty());
    }
}
