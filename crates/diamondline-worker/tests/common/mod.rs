//! Shared test helpers for worker integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use diamondline_cards::domain::aggregates::PlayerCard;
use diamondline_cards::domain::roster::RosterUpdate;
use diamondline_cards::domain::snapshot::ExternalCardSnapshot;
use diamondline_core::cancel::CancellationSource;
use diamondline_reconciliation::config::ReconcileConfig;
use diamondline_reconciliation::service::ReconciliationService;
use diamondline_test_support::fixtures::day;
use diamondline_test_support::{
    FixedClock, InMemoryCardRepository, InMemoryRosterUpdateFeed, RecordingDispatcher,
    StubCardCatalog,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use diamondline_worker::routes;
use diamondline_worker::state::AppState;

/// The worker router wired over in-memory fakes.
pub struct TestApp {
    pub repo: Arc<InMemoryCardRepository>,
    pub catalog: Arc<StubCardCatalog>,
    pub feed: Arc<InMemoryRosterUpdateFeed>,
    pub cancel: CancellationSource,
    app: Router,
}

impl TestApp {
    /// Returns a fresh handle on the router.
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}

/// Build the full app router over fakes whose clock reads 2024-06-01.
/// Uses the same route structure as `main.rs`.
pub fn build_test_app(
    cards: Vec<PlayerCard>,
    snapshots: Vec<ExternalCardSnapshot>,
    batches: Vec<RosterUpdate>,
) -> TestApp {
    let repo = Arc::new(InMemoryCardRepository::with_cards(cards));
    let catalog = Arc::new(StubCardCatalog::with_snapshots(snapshots));
    let feed = Arc::new(InMemoryRosterUpdateFeed::with_batches(batches));
    let dispatcher = Arc::new(RecordingDispatcher::new(
        Arc::new(FixedClock::on(day(6, 1))),
        repo.clone(),
    ));
    let service = Arc::new(ReconciliationService::new(
        catalog.clone(),
        feed.clone(),
        dispatcher.clone(),
        ReconcileConfig::default(),
    ));
    let cancel = CancellationSource::new();
    let app_state = AppState::new(service, dispatcher, cancel.token());

    TestApp {
        repo,
        catalog,
        feed,
        cancel,
        app: routes::router().with_state(app_state),
    }
}

/// Send a POST request with an empty body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
