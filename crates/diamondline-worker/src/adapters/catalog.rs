//! Card catalog read from `cards.json`.

use std::path::PathBuf;

use async_trait::async_trait;
use diamondline_cards::application::ports::{CardCatalog, CatalogError};
use diamondline_cards::domain::snapshot::ExternalCardSnapshot;
use diamondline_cards::domain::values::{CardExternalId, SeasonYear};

use super::read_json_list;

/// Serves snapshots from `{data_dir}/{season}/cards.json`. The file is read
/// on every call, so edits are picked up without a restart.
#[derive(Debug, Clone)]
pub struct FileCardCatalog {
    data_dir: PathBuf,
}

impl FileCardCatalog {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    async fn load(&self, season: SeasonYear) -> Result<Vec<ExternalCardSnapshot>, CatalogError> {
        let path = self.data_dir.join(season.to_string()).join("cards.json");
        read_json_list(&path)
            .await
            .map_err(CatalogError::Unavailable)
    }
}

#[async_trait]
impl CardCatalog for FileCardCatalog {
    async fn get_snapshot(
        &self,
        season: SeasonYear,
        card_external_id: CardExternalId,
    ) -> Result<ExternalCardSnapshot, CatalogError> {
        self.load(season)
            .await?
            .into_iter()
            .find(|snapshot| snapshot.external_id == card_external_id)
            .ok_or(CatalogError::NotFound {
                season,
                card_external_id,
            })
    }

    async fn get_active_roster_snapshots(
        &self,
        season: SeasonYear,
    ) -> Result<Vec<ExternalCardSnapshot>, CatalogError> {
        let snapshots = self.load(season).await?;
        if snapshots.is_empty() {
            return Err(CatalogError::Empty(season));
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use diamondline_test_support::fixtures::{SEASON, attributes, card_id, snapshot};

    use super::*;

    fn write_cards(dir: &std::path::Path, snapshots: &[ExternalCardSnapshot]) {
        let season_dir = dir.join(SEASON.to_string());
        std::fs::create_dir_all(&season_dir).unwrap();
        std::fs::write(
            season_dir.join("cards.json"),
            serde_json::to_vec(snapshots).unwrap(),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_get_snapshot_finds_card_by_id() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let expected = snapshot(card_id(2), 80, attributes(70));
        write_cards(
            dir.path(),
            &[snapshot(card_id(1), 70, attributes(60)), expected.clone()],
        );
        let catalog = FileCardCatalog::new(dir.path());

        // Act
        let found = catalog.get_snapshot(SEASON, card_id(2)).await.unwrap();

        // Assert
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_get_snapshot_reports_unknown_card_as_not_found() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        write_cards(dir.path(), &[snapshot(card_id(1), 70, attributes(60))]);
        let catalog = FileCardCatalog::new(dir.path());

        // Act
        let result = catalog.get_snapshot(SEASON, card_id(5)).await;

        // Assert
        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_empty_roster() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCardCatalog::new(dir.path());

        // Act
        let result = catalog.get_active_roster_snapshots(SEASON).await;

        // Assert
        assert!(matches!(result, Err(CatalogError::Empty(season)) if season == SEASON));
    }

    #[tokio::test]
    async fn test_malformed_file_is_unavailable() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let season_dir = dir.path().join(SEASON.to_string());
        std::fs::create_dir_all(&season_dir).unwrap();
        std::fs::write(season_dir.join("cards.json"), b"{ not json").unwrap();
        let catalog = FileCardCatalog::new(dir.path());

        // Act
        let result = catalog.get_active_roster_snapshots(SEASON).await;

        // Assert
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));
    }
}
