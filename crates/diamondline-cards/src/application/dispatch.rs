//! Routing of card commands and queries to their handlers.
//!
//! The reconciliation engine talks to the card context only through the
//! `Dispatcher` trait, so the context can live in-process or behind a
//! message bus.

use std::sync::Arc;

use async_trait::async_trait;
use diamondline_core::clock::Clock;
use diamondline_core::command::Command;
use diamondline_core::error::DomainError;
use tracing::debug;

use super::command_handlers;
use super::query_handlers::{self, GetCardByExternalId};
use crate::domain::aggregates::PlayerCard;
use crate::domain::commands::{CreateCard, UpdateCard};
use crate::domain::repository::CardRepository;

/// A command accepted by the card context.
#[derive(Debug, Clone)]
pub enum CardCommand {
    Update(UpdateCard),
    Create(CreateCard),
}

impl CardCommand {
    fn as_command(&self) -> &dyn Command {
        match self {
            Self::Update(command) => command as &dyn Command,
            Self::Create(command) => command as &dyn Command,
        }
    }
}

impl From<UpdateCard> for CardCommand {
    fn from(command: UpdateCard) -> Self {
        Self::Update(command)
    }
}

impl From<CreateCard> for CardCommand {
    fn from(command: CreateCard) -> Self {
        Self::Create(command)
    }
}

/// Entry point for reading and changing cards.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Runs a query and returns the card, if tracked.
    async fn query(&self, query: GetCardByExternalId) -> Result<Option<PlayerCard>, DomainError>;

    /// Runs a command to completion.
    async fn command(&self, command: CardCommand) -> Result<(), DomainError>;
}

/// Dispatches directly to the in-process handlers.
#[derive(Clone)]
pub struct LocalDispatcher {
    clock: Arc<dyn Clock>,
    repo: Arc<dyn CardRepository>,
}

impl LocalDispatcher {
    /// Creates a dispatcher over the given clock and repository.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, repo: Arc<dyn CardRepository>) -> Self {
        Self { clock, repo }
    }
}

#[async_trait]
impl Dispatcher for LocalDispatcher {
    async fn query(&self, query: GetCardByExternalId) -> Result<Option<PlayerCard>, DomainError> {
        query_handlers::get_card_by_external_id(query, self.repo.as_ref()).await
    }

    async fn command(&self, command: CardCommand) -> Result<(), DomainError> {
        let envelope = command.as_command();
        debug!(
            command_type = envelope.command_type(),
            correlation_id = %envelope.correlation_id(),
            "dispatching card command"
        );

        match &command {
            CardCommand::Update(update) => {
                command_handlers::handle_update_card(
                    update,
                    self.clock.as_ref(),
                    self.repo.as_ref(),
                )
                .await?;
            }
            CardCommand::Create(create) => {
                command_handlers::handle_create_card(create, self.repo.as_ref()).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::application::command_handlers::tests::{FakeClock, FakeRepository, snapshot};
    use crate::domain::attributes::AttributeSet;

    fn dispatcher(repo: Arc<FakeRepository>) -> LocalDispatcher {
        LocalDispatcher::new(Arc::new(FakeClock), repo)
    }

    #[tokio::test]
    async fn test_command_create_then_query_returns_card() {
        // Arrange
        let repo = Arc::new(FakeRepository::default());
        let dispatcher = dispatcher(Arc::clone(&repo));
        let snapshot = snapshot(70, AttributeSet::uniform(60).unwrap());

        // Act
        dispatcher
            .command(
                CreateCard {
                    correlation_id: Uuid::new_v4(),
                    snapshot: snapshot.clone(),
                }
                .into(),
            )
            .await
            .unwrap();
        let card = dispatcher
            .query(GetCardByExternalId {
                season: snapshot.season,
                card_external_id: snapshot.external_id,
            })
            .await
            .unwrap();

        // Assert
        assert_eq!(card.unwrap().name(), &snapshot.name);
    }

    #[tokio::test]
    async fn test_command_update_propagates_not_found() {
        // Arrange
        let dispatcher = dispatcher(Arc::new(FakeRepository::default()));
        let snapshot = snapshot(70, AttributeSet::uniform(60).unwrap());
        let command = UpdateCard::new(
            snapshot.season,
            snapshot.external_id,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );

        // Act
        let result = dispatcher.command(command.into()).await;

        // Assert
        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }
}
