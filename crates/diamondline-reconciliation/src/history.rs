//! Rebuilds a card's rating history from its current state.
//!
//! The catalog only exposes a card's current attributes. Walking the card's
//! rating changes from newest to oldest and subtracting each change's delta
//! recovers the attributes the card had before that change. Each recovered
//! state covers the interval between the previous (older) change and this
//! one; the oldest reaches back to the first day of the season, or to the
//! card's latest recorded baseline if that is later.

use chrono::NaiveDate;
use diamondline_cards::domain::aggregates::PlayerCard;
use diamondline_cards::domain::periods::{HistoricalRatingPeriod, RatingKind};
use diamondline_cards::domain::roster::PlayerRatingChange;
use diamondline_cards::domain::snapshot::ExternalCardSnapshot;

use crate::error::ReconcileError;

/// The result of reconstructing one card's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconstruction {
    /// The card carries a boost or temporary rating, so its current
    /// attributes are not a baseline. Try again once it has expired.
    Boosted,
    /// Every period is already recorded.
    NoOp,
    /// Periods the card does not record yet, oldest first.
    Appended(Vec<HistoricalRatingPeriod>),
}

/// Reconstructs the periods `card` is missing.
///
/// `changes` may span several batches and arrive in any order. Changes
/// sharing a date are collapsed to the first one seen.
///
/// # Errors
///
/// Returns `ReconcileError::AttributeDrift` if subtracting a delta leaves the
/// valid attribute range.
pub fn reconstruct(
    card: &PlayerCard,
    changes: &[PlayerRatingChange],
    snapshot: &ExternalCardSnapshot,
    season_start: NaiveDate,
) -> Result<Reconstruction, ReconcileError> {
    if card.is_boosted()
        || card.has_temporary_rating()
        || snapshot.is_boosted()
        || snapshot.has_temporary_rating()
    {
        return Ok(Reconstruction::Boosted);
    }

    let changes = newest_first(changes);
    let Some(newest) = changes.first() else {
        return Ok(Reconstruction::NoOp);
    };

    let mut state = snapshot.attributes.clone();
    let mut appended = Vec::new();
    for (i, change) in changes.iter().enumerate() {
        state = change
            .attribute_changes
            .subtract_from(&state)
            .map_err(|e| ReconcileError::AttributeDrift {
                card_external_id: snapshot.external_id,
                date: change.date,
                reason: e.to_string(),
            })?;

        let start = changes
            .get(i + 1)
            .map_or(season_start, |older| older.date)
            .max(recorded_start_before(card, change.date).unwrap_or(season_start));
        // A change on the first day of the season has no earlier period.
        if start >= change.date || card.is_rating_applied_for(start) {
            continue;
        }
        appended.push(HistoricalRatingPeriod::baseline(
            start,
            Some(change.date),
            change.old_rating,
            state.clone(),
        )?);
    }

    if !card.is_rating_applied_for(newest.date) {
        appended.push(HistoricalRatingPeriod::baseline(
            newest.date,
            None,
            newest.new_rating,
            snapshot.attributes.clone(),
        )?);
    }
    if appended.is_empty() {
        return Ok(Reconstruction::NoOp);
    }
    appended.sort_by_key(HistoricalRatingPeriod::start_date);
    Ok(Reconstruction::Appended(appended))
}

/// The latest recorded baseline start before `date`. The interval from there
/// to `date` is already covered by the card's own history.
fn recorded_start_before(card: &PlayerCard, date: NaiveDate) -> Option<NaiveDate> {
    card.historical_ratings()
        .into_iter()
        .filter(|period| period.kind() == RatingKind::Baseline && period.start_date() < date)
        .map(HistoricalRatingPeriod::start_date)
        .max()
}

fn newest_first(changes: &[PlayerRatingChange]) -> Vec<&PlayerRatingChange> {
    let mut sorted: Vec<&PlayerRatingChange> = changes.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.dedup_by_key(|change| change.date);
    sorted
}
