//! Turns one roster update into independent work items.
//!
//! A card with both a rating change and a position change in the same batch
//! gets a single merged work item, so it is loaded and saved once.

use diamondline_cards::domain::roster::{
    PlayerAddition, PlayerPositionChange, PlayerRatingChange, RosterUpdate,
};
use diamondline_cards::domain::values::CardExternalId;

use crate::error::ChangeKind;

/// One unit of work within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem {
    Rating(PlayerRatingChange),
    Position(PlayerPositionChange),
    RatingAndPosition {
        rating: PlayerRatingChange,
        position: PlayerPositionChange,
    },
    Addition(PlayerAddition),
}

impl WorkItem {
    /// The card this item targets, if it names one.
    #[must_use]
    pub fn card_external_id(&self) -> Option<CardExternalId> {
        match self {
            Self::Rating(change) | Self::RatingAndPosition { rating: change, .. } => {
                Some(change.card_external_id)
            }
            Self::Position(change) => Some(change.card_external_id),
            Self::Addition(addition) => addition.card_external_id,
        }
    }

    /// The kind of change, for items that update an existing card.
    #[must_use]
    pub fn change_kind(&self) -> Option<ChangeKind> {
        match self {
            Self::Rating(_) => Some(ChangeKind::Rating),
            Self::Position(_) => Some(ChangeKind::Position),
            Self::RatingAndPosition { .. } => Some(ChangeKind::RatingAndPosition),
            Self::Addition(_) => None,
        }
    }
}

/// Pairs rating changes with position changes for the same card.
///
/// Rating improvements come first, otherwise input order is kept. Position
/// changes that did not pair with a rating change follow as standalone items.
#[must_use]
pub fn classify(
    rating_changes: &[PlayerRatingChange],
    position_changes: &[PlayerPositionChange],
) -> Vec<WorkItem> {
    let mut ratings: Vec<&PlayerRatingChange> = rating_changes.iter().collect();
    ratings.sort_by_key(|change| !change.improved());

    let mut consumed = vec![false; position_changes.len()];
    let mut items = Vec::with_capacity(rating_changes.len() + position_changes.len());

    for rating in ratings {
        let matching = position_changes
            .iter()
            .enumerate()
            .find(|(i, position)| {
                !consumed[*i] && position.card_external_id == rating.card_external_id
            });
        match matching {
            Some((i, position)) => {
                consumed[i] = true;
                items.push(WorkItem::RatingAndPosition {
                    rating: rating.clone(),
                    position: position.clone(),
                });
            }
            None => items.push(WorkItem::Rating(rating.clone())),
        }
    }

    items.extend(
        position_changes
            .iter()
            .zip(consumed)
            .filter(|(_, used)| !used)
            .map(|(position, _)| WorkItem::Position(position.clone())),
    );
    items
}

/// Builds every work item of a batch, additions last.
#[must_use]
pub fn plan(update: &RosterUpdate) -> Vec<WorkItem> {
    let mut items = classify(&update.rating_changes, &update.position_changes);
    items.extend(update.new_players.iter().cloned().map(WorkItem::Addition));
    items
}
