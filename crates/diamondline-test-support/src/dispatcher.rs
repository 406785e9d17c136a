//! Test dispatcher: records every command on its way to the real handlers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use diamondline_cards::application::dispatch::{CardCommand, Dispatcher, LocalDispatcher};
use diamondline_cards::application::query_handlers::GetCardByExternalId;
use diamondline_cards::domain::aggregates::PlayerCard;
use diamondline_cards::domain::commands::UpdateCard;
use diamondline_cards::domain::repository::CardRepository;
use diamondline_core::clock::Clock;
use diamondline_core::error::DomainError;

/// A dispatcher that records commands and forwards them to a
/// `LocalDispatcher`.
pub struct RecordingDispatcher {
    inner: LocalDispatcher,
    commands: Mutex<Vec<CardCommand>>,
}

impl RecordingDispatcher {
    /// Creates a recording dispatcher over the given clock and repository.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, repo: Arc<dyn CardRepository>) -> Self {
        Self {
            inner: LocalDispatcher::new(clock, repo),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Returns every command received, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn commands(&self) -> Vec<CardCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// Returns only the `UpdateCard` commands received.
    #[must_use]
    pub fn update_commands(&self) -> Vec<UpdateCard> {
        self.commands()
            .into_iter()
            .filter_map(|command| match command {
                CardCommand::Update(update) => Some(update),
                CardCommand::Create(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn query(&self, query: GetCardByExternalId) -> Result<Option<PlayerCard>, DomainError> {
        self.inner.query(query).await
    }

    async fn command(&self, command: CardCommand) -> Result<(), DomainError> {
        self.commands.lock().unwrap().push(command.clone());
        self.inner.command(command).await
    }
}
