//! Error taxonomy for the reconciliation engine.

use std::fmt;

use chrono::NaiveDate;
use diamondline_cards::application::ports::{CatalogError, FeedError};
use diamondline_cards::domain::values::{CardExternalId, SeasonYear};
use diamondline_core::cancel::Cancelled;
use diamondline_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Which kind of roster change referenced a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Rating,
    Position,
    RatingAndPosition,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rating => "rating change",
            Self::Position => "position change",
            Self::RatingAndPosition => "rating and position change",
        })
    }
}

/// One failed work item of an aborted batch.
#[derive(Debug)]
pub struct CardFailure {
    /// The card the work item targeted. Absent for additions without an
    /// identity.
    pub card_external_id: Option<CardExternalId>,
    pub error: ReconcileError,
}

impl fmt::Display for CardFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.card_external_id {
            Some(id) => write!(f, "{id}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Errors raised by the reconciliation engine.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The catalog has no active cards for the season. The domain cannot be
    /// seeded, so the whole cycle stops.
    #[error("no cards found in the {season} catalog")]
    NoCardsFound { season: SeasonYear },

    /// A roster change references a card that is not tracked.
    #[error("found a {kind} for {card_external_id}, but there is no corresponding card")]
    CardNotFoundForUpdate {
        card_external_id: CardExternalId,
        kind: ChangeKind,
    },

    /// A new player has no entry in the catalog.
    #[error(
        "roster update had a new player named {player_name} with ID {card_external_id}, but the catalog has no record of it"
    )]
    ExternalCardMissingForAddition {
        card_external_id: CardExternalId,
        player_name: String,
    },

    /// At least one work item of a batch failed. The batch was not
    /// acknowledged.
    #[error("roster update {date} was interrupted: {}", join_failures(.failures))]
    BatchInterrupted {
        date: NaiveDate,
        failures: Vec<CardFailure>,
    },

    /// Subtracting the recorded deltas from the current attributes left the
    /// valid range, so the deltas do not describe the card's real history.
    #[error("rating history of {card_external_id} does not reconcile at {date}: {reason}")]
    AttributeDrift {
        card_external_id: CardExternalId,
        date: NaiveDate,
        reason: String,
    },

    /// The configured season start is not a calendar date.
    #[error("season {season} cannot start on {month:02}-{day:02}")]
    InvalidSeasonStart {
        season: SeasonYear,
        month: u32,
        day: u32,
    },

    /// The cancellation signal was raised while waiting on a collaborator.
    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl From<Cancelled> for ReconcileError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl ReconcileError {
    /// Returns every card named by this error. For an interrupted batch this
    /// lists the card of each failed work item.
    #[must_use]
    pub fn failed_cards(&self) -> Vec<CardExternalId> {
        match self {
            Self::BatchInterrupted { failures, .. } => failures
                .iter()
                .filter_map(|failure| failure.card_external_id)
                .collect(),
            Self::CardNotFoundForUpdate {
                card_external_id, ..
            }
            | Self::ExternalCardMissingForAddition {
                card_external_id, ..
            }
            | Self::AttributeDrift {
                card_external_id, ..
            }
            | Self::Catalog(CatalogError::NotFound {
                card_external_id, ..
            }) => vec![*card_external_id],
            _ => Vec::new(),
        }
    }
}

fn join_failures(failures: &[CardFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
