//! Integration tests for seeding tracked cards from the catalog.

mod common;

use diamondline_core::cancel::CancellationToken;
use diamondline_reconciliation::error::ReconcileError;
use diamondline_test_support::fixtures::{SEASON, attributes, card, card_id, snapshot};

use common::engine;

#[tokio::test]
async fn test_track_cards_creates_only_untracked_cards() {
    // Arrange
    let known = snapshot(card_id(1), 70, attributes(60));
    let e = engine(
        vec![card(&known)],
        vec![
            known,
            snapshot(card_id(3), 80, attributes(70)),
            snapshot(card_id(2), 65, attributes(55)),
        ],
        vec![],
    );

    // Act
    let result = e
        .service
        .track_cards(SEASON, &CancellationToken::never())
        .await
        .unwrap();

    // Assert
    assert_eq!(result.created, vec![card_id(2), card_id(3)]);
    assert_eq!(result.existing, 1);
    assert_eq!(e.repo.len(), 3);
}

#[tokio::test]
async fn test_track_cards_with_empty_catalog_is_no_cards_found() {
    // Arrange
    let e = engine(vec![], vec![], vec![]);

    // Act
    let result = e
        .service
        .track_cards(SEASON, &CancellationToken::never())
        .await;

    // Assert
    assert!(matches!(
        result,
        Err(ReconcileError::NoCardsFound { season }) if season == SEASON
    ));
}

#[tokio::test]
async fn test_tracking_twice_creates_nothing_the_second_time() {
    // Arrange
    let e = engine(vec![], vec![snapshot(card_id(1), 70, attributes(60))], vec![]);
    let cancel = CancellationToken::never();
    e.service.track_cards(SEASON, &cancel).await.unwrap();

    // Act
    let second = e.service.track_cards(SEASON, &cancel).await.unwrap();

    // Assert
    assert!(second.created.is_empty());
    assert_eq!(second.existing, 1);
}
