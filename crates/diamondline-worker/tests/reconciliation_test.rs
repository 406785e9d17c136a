//! Integration tests for the reconciliation and card routes.

mod common;

use axum::http::StatusCode;
use diamondline_cards::domain::attributes::{Attribute, AttributeChanges};
use diamondline_test_support::fixtures::{
    SEASON, attributes, boosted, card, card_id, day, rating_change, roster_update, snapshot,
};

use common::{build_test_app, get_json, post_empty};

#[tokio::test]
async fn test_track_cards_returns_created_ids() {
    // Arrange
    let tracked = snapshot(card_id(1), 70, attributes(60));
    let untracked = snapshot(card_id(2), 80, attributes(70));
    let app = build_test_app(vec![card(&tracked)], vec![tracked, untracked], vec![]);

    // Act
    let (status, json) =
        post_empty(app.router(), &format!("/api/v1/seasons/{SEASON}/cards/track")).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["created"], serde_json::json!([card_id(2).to_string()]));
    assert_eq!(json["existing"], 1);
    assert_eq!(app.repo.len(), 2);
}

#[tokio::test]
async fn test_track_cards_with_empty_catalog_returns_404() {
    let app = build_test_app(vec![], vec![], vec![]);

    let (status, json) =
        post_empty(app.router(), &format!("/api/v1/seasons/{SEASON}/cards/track")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "no_cards_found");
}

#[tokio::test]
async fn test_sync_roster_updates_applies_pending_batches() {
    // Arrange
    let before = snapshot(card_id(1), 70, attributes(60));
    let after = snapshot(card_id(1), 75, attributes(62));
    let batch = roster_update(
        day(4, 7),
        vec![rating_change(card_id(1), day(4, 7), 70, 75, AttributeChanges::none())],
        vec![],
        vec![],
    );
    let app = build_test_app(vec![card(&before)], vec![after], vec![batch]);

    // Act
    let (status, json) = post_empty(
        app.router(),
        &format!("/api/v1/seasons/{SEASON}/roster-updates/sync"),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["date"], "2024-04-07");
    assert_eq!(json[0]["applied"], 1);
    assert_eq!(app.feed.acknowledged(), vec![day(4, 7)]);
    let stored = app.repo.card(SEASON, card_id(1)).unwrap();
    assert_eq!(stored.overall_rating().value(), 75);
}

#[tokio::test]
async fn test_sync_roster_updates_with_untracked_card_returns_409_with_failures() {
    // Arrange
    let batch = roster_update(
        day(4, 7),
        vec![rating_change(card_id(9), day(4, 7), 70, 75, AttributeChanges::none())],
        vec![],
        vec![],
    );
    let app = build_test_app(vec![], vec![], vec![batch]);

    // Act
    let (status, json) = post_empty(
        app.router(),
        &format!("/api/v1/seasons/{SEASON}/roster-updates/sync"),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "batch_interrupted");
    assert_eq!(json["failures"].as_array().unwrap().len(), 1);
    assert_eq!(json["failures"][0]["card_external_id"], card_id(9).to_string());
    assert!(app.feed.acknowledged().is_empty());
}

#[tokio::test]
async fn test_sync_roster_updates_after_shutdown_returns_503() {
    // Arrange
    let batch = roster_update(
        day(4, 7),
        vec![rating_change(card_id(1), day(4, 7), 70, 75, AttributeChanges::none())],
        vec![],
        vec![],
    );
    let app = build_test_app(vec![], vec![], vec![batch]);
    app.cancel.cancel();

    // Act
    let (status, json) = post_empty(
        app.router(),
        &format!("/api/v1/seasons/{SEASON}/roster-updates/sync"),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "cancelled");
    assert!(app.feed.acknowledged().is_empty());
}

#[tokio::test]
async fn test_sync_history_returns_rebuilt_periods_and_skips() {
    // Arrange
    let current = snapshot(card_id(1), 75, attributes(64));
    let promoted = boosted(snapshot(card_id(2), 99, attributes(90)));
    let delta = AttributeChanges::none().with(Attribute::PowerLeft, 4);
    let batch = roster_update(
        day(4, 7),
        vec![
            rating_change(card_id(1), day(4, 7), 70, 75, delta),
            rating_change(card_id(2), day(4, 7), 80, 85, AttributeChanges::none()),
        ],
        vec![],
        vec![],
    );
    let app = build_test_app(
        vec![card(&current), card(&promoted)],
        vec![current, promoted],
        vec![batch],
    );

    // Act
    let (status, json) =
        post_empty(app.router(), &format!("/api/v1/seasons/{SEASON}/history/sync")).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let periods = &json["updated_cards"][card_id(1).to_string()];
    assert_eq!(periods.as_array().unwrap().len(), 2);
    assert_eq!(periods[0]["start_date"], "2024-01-01");
    assert_eq!(periods[0]["end_date"], "2024-04-07");
    assert_eq!(periods[0]["overall_rating"], 70);
    assert_eq!(periods[1]["start_date"], "2024-04-07");
    assert!(periods[1]["end_date"].is_null());
    assert_eq!(json["skipped"].as_array().unwrap().len(), 1);
    assert_eq!(json["skipped"][0]["card_external_id"], card_id(2).to_string());
    assert_eq!(json["skipped"][0]["reason"]["kind"], "boosted");
}

#[tokio::test]
async fn test_get_card_returns_view_of_tracked_card() {
    // Arrange
    let current = snapshot(card_id(1), 75, attributes(64));
    let app = build_test_app(vec![card(&current)], vec![], vec![]);

    // Act
    let (status, json) = get_json(
        app.router(),
        &format!("/api/v1/seasons/{SEASON}/cards/{}", card_id(1)),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["card_external_id"], card_id(1).to_string());
    assert_eq!(json["overall_rating"], 75);
    assert_eq!(json["is_boosted"], false);
    assert_eq!(json["attributes"]["power_left"], 64);
}

#[tokio::test]
async fn test_get_unknown_card_returns_404() {
    let app = build_test_app(vec![], vec![], vec![]);

    let (status, json) = get_json(
        app.router(),
        &format!("/api/v1/seasons/{SEASON}/cards/{}", card_id(3)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "card_not_found");
}
