//! Shared test fakes and fixtures for the Diamondline engine.

mod catalog;
mod clock;
mod dispatcher;
mod feed;
pub mod fixtures;
mod repository;

pub use catalog::StubCardCatalog;
pub use clock::FixedClock;
pub use dispatcher::RecordingDispatcher;
pub use feed::InMemoryRosterUpdateFeed;
pub use repository::{FailingCardRepository, InMemoryCardRepository};
