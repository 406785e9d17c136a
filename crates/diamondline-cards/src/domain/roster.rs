//! Roster updates as published by the external feed.
//!
//! A roster update is an immutable batch. It is consumed exactly once and
//! acknowledged only after every change in it has been applied.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::aggregates::PlayerCard;
use super::attributes::AttributeChanges;
use super::values::{CardExternalId, OverallRating, Position};

/// One batch of roster changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterUpdate {
    /// The day the roster update was published.
    pub date: NaiveDate,
    #[serde(default)]
    pub rating_changes: Vec<PlayerRatingChange>,
    #[serde(default)]
    pub position_changes: Vec<PlayerPositionChange>,
    #[serde(default)]
    pub new_players: Vec<PlayerAddition>,
}

/// A change in a card's overall rating and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRatingChange {
    pub card_external_id: CardExternalId,
    pub date: NaiveDate,
    pub old_rating: OverallRating,
    pub new_rating: OverallRating,
    /// Delta from the old attribute state to the new one.
    #[serde(default)]
    pub attribute_changes: AttributeChanges,
}

impl PlayerRatingChange {
    /// Returns `true` if the overall rating went up.
    #[must_use]
    pub fn improved(&self) -> bool {
        self.new_rating > self.old_rating
    }

    /// Returns `true` if the card already records a rating starting on the
    /// day of this change.
    #[must_use]
    pub fn is_applied(&self, card: &PlayerCard) -> bool {
        card.is_rating_applied_for(self.date)
    }
}

/// A change in a card's primary position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPositionChange {
    pub card_external_id: CardExternalId,
    pub date: NaiveDate,
    pub old_position: Position,
    pub new_position: Position,
}

impl PlayerPositionChange {
    /// Returns `true` if the card is already at the new position.
    #[must_use]
    pub fn is_applied(&self, card: &PlayerCard) -> bool {
        card.position() == self.new_position
    }
}

/// A card that is new to the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAddition {
    /// Absent when the feed lists a player the catalog knows nothing about.
    pub card_external_id: Option<CardExternalId>,
    pub player_name: String,
}
