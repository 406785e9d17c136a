//! Command handlers for the card context.
//!
//! Each handler loads the aggregate, applies the command, and saves the
//! result in a single cycle.

use diamondline_core::clock::Clock;
use diamondline_core::error::DomainError;

use crate::domain::aggregates::PlayerCard;
use crate::domain::commands::{CreateCard, UpdateCard};
use crate::domain::repository::CardRepository;
use crate::domain::snapshot::ExternalCardSnapshot;

/// Handles the `UpdateCard` command.
///
/// Applies, in order: reconstructed history, the rating change, the position
/// change, and boost/temporary state taken from the snapshot. Parts that the
/// card already reflects are left alone, so replaying the command is safe.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the card is not tracked.
/// Returns `DomainError::Validation` if a change would corrupt the history.
pub async fn handle_update_card(
    command: &UpdateCard,
    clock: &dyn Clock,
    repo: &dyn CardRepository,
) -> Result<PlayerCard, DomainError> {
    let mut card = repo
        .get_by_external_id(command.season, command.card_external_id)
        .await?
        .ok_or_else(|| DomainError::AggregateNotFound(command.card_external_id.as_uuid()))?;

    for period in &command.historical_periods {
        if !card.is_rating_applied_for(period.start_date()) {
            card.add_historical_rating(period.clone())?;
        }
    }

    if let Some(change) = &command.rating_change {
        // A boosted snapshot carries boosted attributes, not the new baseline.
        let attributes = match command.snapshot.as_ref().filter(|s| !s.is_boosted()) {
            Some(snapshot) => snapshot.attributes.clone(),
            None => change.attribute_changes.apply_to(card.attributes())?,
        };
        card.change_player_rating(
            change.date,
            command.season_start,
            change.new_rating,
            attributes,
        )?;
    }

    if let Some(change) = &command.position_change {
        if !change.is_applied(&card) {
            card.change_position(change.new_position);
        }
    }

    if let Some(snapshot) = &command.snapshot {
        sync_special_ratings(&mut card, snapshot, clock)?;
    }

    repo.update(card.clone()).await?;
    Ok(card)
}

/// Handles the `CreateCard` command.
///
/// # Errors
///
/// Returns `DomainError::AlreadyExists` if the card is already tracked.
pub async fn handle_create_card(
    command: &CreateCard,
    repo: &dyn CardRepository,
) -> Result<PlayerCard, DomainError> {
    let snapshot = &command.snapshot;
    if repo
        .get_by_external_id(snapshot.season, snapshot.external_id)
        .await?
        .is_some()
    {
        return Err(DomainError::AlreadyExists(snapshot.external_id.as_uuid()));
    }

    let card = PlayerCard::from_snapshot(snapshot);
    repo.add(card.clone()).await?;
    Ok(card)
}

fn sync_special_ratings(
    card: &mut PlayerCard,
    snapshot: &ExternalCardSnapshot,
    clock: &dyn Clock,
) -> Result<(), DomainError> {
    let today = clock.today();

    match (snapshot.is_boosted(), card.is_boosted()) {
        (true, false) => card.boost(today, snapshot.attributes.clone())?,
        (false, true) => card.remove_boost(today, snapshot.attributes.clone())?,
        _ => {}
    }

    match (snapshot.temporary_overall_rating, card.has_temporary_rating()) {
        (Some(rating), false) => card.set_temporary_rating(today, rating)?,
        (None, true) => card.remove_temporary_rating(today)?,
        _ => {}
    }

    Ok(())
}
