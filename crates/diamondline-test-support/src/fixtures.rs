//! Fixture builders for cards, snapshots and roster updates.

use chrono::NaiveDate;
use diamondline_cards::domain::aggregates::PlayerCard;
use diamondline_cards::domain::attributes::{AttributeChanges, AttributeSet};
use diamondline_cards::domain::roster::{
    PlayerAddition, PlayerPositionChange, PlayerRatingChange, RosterUpdate,
};
use diamondline_cards::domain::snapshot::ExternalCardSnapshot;
use diamondline_cards::domain::values::{
    CardExternalId, CardName, OverallRating, Position, SeasonYear,
};
use uuid::Uuid;

/// The season every fixture belongs to.
pub const SEASON: SeasonYear = SeasonYear::new(2024);

/// A day in the fixture season.
///
/// # Panics
///
/// Panics if the date does not exist.
#[must_use]
pub fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

/// A deterministic card identity.
#[must_use]
pub fn card_id(n: u128) -> CardExternalId {
    CardExternalId::new(Uuid::from_u128(n))
}

/// An overall rating.
///
/// # Panics
///
/// Panics if `value` is out of range.
#[must_use]
pub fn rating(value: u8) -> OverallRating {
    OverallRating::new(value).unwrap()
}

/// An attribute set with every attribute at `value`.
///
/// # Panics
///
/// Panics if `value` is out of range.
#[must_use]
pub fn attributes(value: i32) -> AttributeSet {
    AttributeSet::uniform(value).unwrap()
}

/// A catalog snapshot of a shortstop in the fixture season.
///
/// # Panics
///
/// Panics if `overall` is out of range.
#[must_use]
pub fn snapshot(id: CardExternalId, overall: u8, attributes: AttributeSet) -> ExternalCardSnapshot {
    ExternalCardSnapshot {
        season: SEASON,
        external_id: id,
        name: CardName::new(format!("Player {}", id.as_uuid().as_u128())).unwrap(),
        position: Position::Shortstop,
        overall_rating: rating(overall),
        attributes,
        boost_reason: None,
        temporary_overall_rating: None,
    }
}

/// The same snapshot, marked as boosted.
#[must_use]
pub fn boosted(mut snapshot: ExternalCardSnapshot) -> ExternalCardSnapshot {
    snapshot.boost_reason = Some("Player of the Week".to_owned());
    snapshot
}

/// A tracked card created from `snapshot`, with no history.
#[must_use]
pub fn card(snapshot: &ExternalCardSnapshot) -> PlayerCard {
    PlayerCard::from_snapshot(snapshot)
}

/// A rating change on `date`.
#[must_use]
pub fn rating_change(
    id: CardExternalId,
    date: NaiveDate,
    old: u8,
    new: u8,
    attribute_changes: AttributeChanges,
) -> PlayerRatingChange {
    PlayerRatingChange {
        card_external_id: id,
        date,
        old_rating: rating(old),
        new_rating: rating(new),
        attribute_changes,
    }
}

/// A position change on `date`.
#[must_use]
pub fn position_change(
    id: CardExternalId,
    date: NaiveDate,
    old: Position,
    new: Position,
) -> PlayerPositionChange {
    PlayerPositionChange {
        card_external_id: id,
        date,
        old_position: old,
        new_position: new,
    }
}

/// A player addition.
#[must_use]
pub fn addition(id: Option<CardExternalId>, name: &str) -> PlayerAddition {
    PlayerAddition {
        card_external_id: id,
        player_name: name.to_owned(),
    }
}

/// A roster update published on `date`.
#[must_use]
pub fn roster_update(
    date: NaiveDate,
    rating_changes: Vec<PlayerRatingChange>,
    position_changes: Vec<PlayerPositionChange>,
    new_players: Vec<PlayerAddition>,
) -> RosterUpdate {
    RosterUpdate {
        date,
        rating_changes,
        position_changes,
        new_players,
    }
}
