//! Integration tests for applying roster update batches.

mod common;

use diamondline_cards::domain::attributes::{Attribute, AttributeChanges};
use diamondline_cards::domain::repository::CardRepository;
use diamondline_cards::domain::values::Position;
use diamondline_core::cancel::{CancellationSource, CancellationToken};
use diamondline_reconciliation::error::ReconcileError;
use diamondline_test_support::fixtures::{
    SEASON, addition, attributes, card, card_id, day, position_change, rating_change,
    roster_update, snapshot,
};

use common::engine;

#[tokio::test]
async fn test_rating_and_position_change_for_same_card_issue_one_command() {
    // Arrange
    let before = snapshot(card_id(1), 70, attributes(60));
    let after = snapshot(card_id(1), 75, attributes(62));
    let batch = roster_update(
        day(4, 7),
        vec![rating_change(card_id(1), day(4, 7), 70, 75, AttributeChanges::none())],
        vec![position_change(
            card_id(1),
            day(4, 7),
            Position::Shortstop,
            Position::ThirdBase,
        )],
        vec![],
    );
    let e = engine(vec![card(&before)], vec![after], vec![batch]);

    // Act
    let results = e
        .service
        .sync_roster_updates(SEASON, &CancellationToken::never())
        .await
        .unwrap();

    // Assert
    let updates = e.dispatcher.update_commands();
    assert_eq!(updates.len(), 1);
    assert!(updates[0].rating_change.is_some());
    assert!(updates[0].position_change.is_some());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].applied, 1);
    assert_eq!(e.feed.acknowledged(), vec![day(4, 7)]);
    let stored = e.repo.card(SEASON, card_id(1)).unwrap();
    assert_eq!(stored.position(), Position::ThirdBase);
    assert_eq!(stored.overall_rating().value(), 75);
    assert_eq!(stored.attributes(), &attributes(62));
}

#[tokio::test]
async fn test_missing_card_aborts_batch_without_acknowledging() {
    // Arrange
    let tracked = snapshot(card_id(1), 70, attributes(60));
    let batch = roster_update(
        day(4, 7),
        vec![
            rating_change(card_id(1), day(4, 7), 70, 75, AttributeChanges::none()),
            rating_change(card_id(2), day(4, 7), 60, 65, AttributeChanges::none()),
        ],
        vec![],
        vec![],
    );
    let e = engine(
        vec![card(&tracked)],
        vec![snapshot(card_id(1), 75, attributes(60))],
        vec![batch],
    );

    // Act
    let result = e
        .service
        .sync_roster_updates(SEASON, &CancellationToken::never())
        .await;

    // Assert
    let error = result.unwrap_err();
    assert!(matches!(error, ReconcileError::BatchInterrupted { .. }));
    assert_eq!(error.failed_cards(), vec![card_id(2)]);
    assert!(error.to_string().contains(&card_id(2).to_string()));
    assert!(e.feed.acknowledged().is_empty());
    let applied = e.repo.card(SEASON, card_id(1)).unwrap();
    assert_eq!(applied.overall_rating().value(), 75);
}

#[tokio::test]
async fn test_retrying_an_aborted_batch_does_not_reapply_changes() {
    // Arrange
    let first = snapshot(card_id(1), 70, attributes(60));
    let second = snapshot(card_id(2), 60, attributes(50));
    let batch = roster_update(
        day(4, 7),
        vec![
            rating_change(card_id(1), day(4, 7), 70, 75, AttributeChanges::none()),
            rating_change(card_id(2), day(4, 7), 60, 65, AttributeChanges::none()),
        ],
        vec![],
        vec![],
    );
    let e = engine(
        vec![card(&first)],
        vec![
            snapshot(card_id(1), 75, attributes(60)),
            snapshot(card_id(2), 65, attributes(50)),
        ],
        vec![batch],
    );
    let cancel = CancellationToken::never();
    assert!(e.service.sync_roster_updates(SEASON, &cancel).await.is_err());
    e.repo.add(card(&second)).await.unwrap();

    // Act
    let results = e.service.sync_roster_updates(SEASON, &cancel).await.unwrap();

    // Assert
    assert_eq!(results[0].applied, 1);
    assert_eq!(results[0].already_applied, 1);
    let card_one_updates = e
        .dispatcher
        .update_commands()
        .iter()
        .filter(|update| update.card_external_id == card_id(1))
        .count();
    assert_eq!(card_one_updates, 1);
    assert_eq!(
        e.repo
            .card(SEASON, card_id(1))
            .unwrap()
            .historical_ratings()
            .len(),
        2
    );
    assert_eq!(e.feed.acknowledged(), vec![day(4, 7)]);
}

#[tokio::test]
async fn test_batches_apply_in_order_and_stop_at_first_failure() {
    // Arrange
    let tracked = snapshot(card_id(1), 70, attributes(60));
    let delta = AttributeChanges::none().with(Attribute::Speed, 5);
    let batches = vec![
        roster_update(
            day(5, 20),
            vec![rating_change(card_id(1), day(5, 20), 75, 80, delta)],
            vec![],
            vec![addition(Some(card_id(9)), "Missing Rookie")],
        ),
        roster_update(
            day(4, 7),
            vec![rating_change(card_id(1), day(4, 7), 70, 75, delta)],
            vec![],
            vec![],
        ),
    ];
    let e = engine(
        vec![card(&tracked)],
        vec![snapshot(card_id(1), 75, attributes(60).with(Attribute::Speed, 65).unwrap())],
        batches,
    );

    // Act
    let result = e
        .service
        .sync_roster_updates(SEASON, &CancellationToken::never())
        .await;

    // Assert
    match result.unwrap_err() {
        ReconcileError::BatchInterrupted { date, failures } => {
            assert_eq!(date, day(5, 20));
            assert_eq!(failures.len(), 1);
            assert!(matches!(
                failures[0].error,
                ReconcileError::ExternalCardMissingForAddition { .. }
            ));
        }
        other => panic!("expected BatchInterrupted, got {other:?}"),
    }
    assert_eq!(e.feed.acknowledged(), vec![day(4, 7)]);
}

#[tokio::test]
async fn test_new_players_are_created_and_blank_identities_skipped() {
    // Arrange
    let rookie = snapshot(card_id(9), 62, attributes(55));
    let batch = roster_update(
        day(4, 7),
        vec![],
        vec![],
        vec![addition(Some(card_id(9)), "Rookie"), addition(None, "Prospect")],
    );
    let e = engine(vec![], vec![rookie], vec![batch]);

    // Act
    let results = e
        .service
        .sync_roster_updates(SEASON, &CancellationToken::never())
        .await
        .unwrap();

    // Assert
    assert_eq!(results[0].created, 1);
    assert_eq!(results[0].skipped, 1);
    assert!(e.repo.card(SEASON, card_id(9)).is_some());
}

#[tokio::test]
async fn test_cancellation_leaves_batch_unacknowledged() {
    // Arrange
    let tracked = snapshot(card_id(1), 70, attributes(60));
    let batch = roster_update(
        day(4, 7),
        vec![rating_change(card_id(1), day(4, 7), 70, 75, AttributeChanges::none())],
        vec![],
        vec![],
    );
    let e = engine(vec![card(&tracked)], vec![tracked.clone()], vec![batch]);
    e.catalog.hang_for(card_id(1));
    let source = CancellationSource::new();
    let token = source.token();

    // Act
    let (result, ()) = tokio::join!(e.service.sync_roster_updates(SEASON, &token), async {
        tokio::task::yield_now().await;
        source.cancel();
    });

    // Assert
    assert!(matches!(result, Err(ReconcileError::Cancelled)));
    assert!(e.feed.acknowledged().is_empty());
    assert_eq!(
        e.repo.card(SEASON, card_id(1)).unwrap().overall_rating().value(),
        70
    );
}

#[tokio::test]
async fn test_overlapping_runs_apply_and_acknowledge_batch_once() {
    // Arrange
    let before = snapshot(card_id(1), 70, attributes(60));
    let after = snapshot(card_id(1), 75, attributes(62));
    let batch = roster_update(
        day(4, 7),
        vec![rating_change(card_id(1), day(4, 7), 70, 75, AttributeChanges::none())],
        vec![],
        vec![],
    );
    let e = engine(vec![card(&before)], vec![after], vec![batch]);
    e.catalog.slow_for(card_id(1));
    let cancel = CancellationToken::never();

    // Act
    let (first, second) = tokio::join!(
        e.service.sync_roster_updates(SEASON, &cancel),
        e.service.sync_roster_updates(SEASON, &cancel)
    );

    // Assert
    assert_eq!(first.unwrap().len(), 1);
    assert!(second.unwrap().is_empty());
    assert_eq!(e.dispatcher.update_commands().len(), 1);
    assert_eq!(e.feed.acknowledged(), vec![day(4, 7)]);
}
