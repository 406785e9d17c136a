//! Shared harness for engine integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use diamondline_cards::domain::aggregates::PlayerCard;
use diamondline_cards::domain::roster::RosterUpdate;
use diamondline_cards::domain::snapshot::ExternalCardSnapshot;
use diamondline_reconciliation::config::ReconcileConfig;
use diamondline_reconciliation::service::ReconciliationService;
use diamondline_test_support::fixtures::day;
use diamondline_test_support::{
    FixedClock, InMemoryCardRepository, InMemoryRosterUpdateFeed, RecordingDispatcher,
    StubCardCatalog,
};

/// The engine wired over in-memory fakes, with handles on every fake.
pub struct Engine {
    pub repo: Arc<InMemoryCardRepository>,
    pub catalog: Arc<StubCardCatalog>,
    pub feed: Arc<InMemoryRosterUpdateFeed>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub service: ReconciliationService,
}

/// Builds an engine whose clock reads 2024-06-01.
pub fn engine(
    cards: Vec<PlayerCard>,
    snapshots: Vec<ExternalCardSnapshot>,
    batches: Vec<RosterUpdate>,
) -> Engine {
    let repo = Arc::new(InMemoryCardRepository::with_cards(cards));
    let catalog = Arc::new(StubCardCatalog::with_snapshots(snapshots));
    let feed = Arc::new(InMemoryRosterUpdateFeed::with_batches(batches));
    let dispatcher = Arc::new(RecordingDispatcher::new(
        Arc::new(FixedClock::on(day(6, 1))),
        repo.clone(),
    ));
    let service = ReconciliationService::new(
        catalog.clone(),
        feed.clone(),
        dispatcher.clone(),
        ReconcileConfig::default(),
    );
    Engine {
        repo,
        catalog,
        feed,
        dispatcher,
        service,
    }
}
