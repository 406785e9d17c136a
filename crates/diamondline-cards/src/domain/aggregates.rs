//! Aggregate roots for the card context.

use chrono::NaiveDate;
use diamondline_core::error::DomainError;

use super::attributes::AttributeSet;
use super::periods::{HistoricalRatingPeriod, RatingKind};
use super::snapshot::ExternalCardSnapshot;
use super::values::{CardExternalId, CardName, OverallRating, Position, SeasonYear};

/// The aggregate root for a player card.
///
/// Holds the card's current rating and attributes plus a history of rating
/// periods. Baseline periods never overlap: each new rating closes the open
/// baseline period on the day it takes effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCard {
    season: SeasonYear,
    external_id: CardExternalId,
    name: CardName,
    position: Position,
    overall_rating: OverallRating,
    attributes: AttributeSet,
    historical_ratings: Vec<HistoricalRatingPeriod>,
}

impl PlayerCard {
    /// Creates a card with no rating history.
    #[must_use]
    pub fn new(
        season: SeasonYear,
        external_id: CardExternalId,
        name: CardName,
        position: Position,
        overall_rating: OverallRating,
        attributes: AttributeSet,
    ) -> Self {
        Self {
            season,
            external_id,
            name,
            position,
            overall_rating,
            attributes,
            historical_ratings: Vec::new(),
        }
    }

    /// Creates a card from the catalog's current view of it.
    #[must_use]
    pub fn from_snapshot(snapshot: &ExternalCardSnapshot) -> Self {
        Self::new(
            snapshot.season,
            snapshot.external_id,
            snapshot.name.clone(),
            snapshot.position,
            snapshot.overall_rating,
            snapshot.attributes.clone(),
        )
    }

    #[must_use]
    pub fn season(&self) -> SeasonYear {
        self.season
    }

    #[must_use]
    pub fn external_id(&self) -> CardExternalId {
        self.external_id
    }

    #[must_use]
    pub fn name(&self) -> &CardName {
        &self.name
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn overall_rating(&self) -> OverallRating {
        self.overall_rating
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Returns the rating history ordered by start date.
    #[must_use]
    pub fn historical_ratings(&self) -> Vec<&HistoricalRatingPeriod> {
        let mut ratings: Vec<&HistoricalRatingPeriod> = self.historical_ratings.iter().collect();
        ratings.sort_by_key(|rating| rating.start_date());
        ratings
    }

    /// Returns the baseline period in effect on `date`, if any.
    #[must_use]
    pub fn baseline_rating_on(&self, date: NaiveDate) -> Option<&HistoricalRatingPeriod> {
        self.historical_ratings
            .iter()
            .find(|rating| rating.kind() == RatingKind::Baseline && rating.contains(date))
    }

    /// Returns `true` while a boost period is open.
    #[must_use]
    pub fn is_boosted(&self) -> bool {
        self.historical_ratings
            .iter()
            .any(|rating| rating.kind() == RatingKind::Boost && rating.is_open())
    }

    /// Returns `true` while a temporary rating period is open.
    #[must_use]
    pub fn has_temporary_rating(&self) -> bool {
        self.historical_ratings
            .iter()
            .any(|rating| rating.kind() == RatingKind::Temporary && rating.is_open())
    }

    /// Returns `true` if any recorded period starts on `date`.
    #[must_use]
    pub fn is_rating_applied_for(&self, date: NaiveDate) -> bool {
        self.historical_ratings
            .iter()
            .any(|rating| rating.start_date() == date)
    }

    /// Records a historical rating period.
    ///
    /// A baseline period closes any open baseline that started before it, so
    /// at most one baseline stays open.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a period of the same kind already
    /// starts on the same day.
    pub fn add_historical_rating(
        &mut self,
        rating: HistoricalRatingPeriod,
    ) -> Result<(), DomainError> {
        let exists = self.historical_ratings.iter().any(|existing| {
            existing.start_date() == rating.start_date() && existing.kind() == rating.kind()
        });
        if exists {
            return Err(DomainError::Validation(format!(
                "a {:?} rating already exists for card {} starting {}",
                rating.kind(),
                self.external_id,
                rating.start_date()
            )));
        }
        if rating.kind() == RatingKind::Baseline {
            for stale in self.historical_ratings.iter_mut().filter(|existing| {
                existing.kind() == RatingKind::Baseline
                    && existing.is_open()
                    && existing.start_date() < rating.start_date()
            }) {
                stale.end(rating.start_date())?;
            }
        }
        self.historical_ratings.push(rating);
        Ok(())
    }

    /// Applies a new baseline rating taking effect on `date`.
    ///
    /// The open baseline period is closed on `date`; if the card has no
    /// baseline history yet, its pre-change state is recorded from
    /// `season_start` (nothing is recorded for a change on the season
    /// start). When a period already starts on `date` the history is left
    /// untouched and only the current rating is refreshed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the new period would overlap the
    /// recorded history.
    pub fn change_player_rating(
        &mut self,
        date: NaiveDate,
        season_start: NaiveDate,
        new_rating: OverallRating,
        new_attributes: AttributeSet,
    ) -> Result<(), DomainError> {
        if !self.is_rating_applied_for(date) {
            if let Some(current) = self.open_period_mut(RatingKind::Baseline) {
                current.end(date)?;
            } else if season_start < date {
                let previous = HistoricalRatingPeriod::baseline(
                    season_start,
                    Some(date),
                    self.overall_rating,
                    self.attributes.clone(),
                )?;
                self.add_historical_rating(previous)?;
            }
            self.add_historical_rating(HistoricalRatingPeriod::baseline(
                date,
                None,
                new_rating,
                new_attributes.clone(),
            )?)?;
        }

        self.overall_rating = new_rating;
        self.attributes = new_attributes;
        Ok(())
    }

    /// Moves the card to a new primary position.
    pub fn change_position(&mut self, new_position: Position) {
        self.position = new_position;
    }

    /// Starts a boost on `date`. The boosted card carries the maximum rating.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a boost already starts on `date`.
    pub fn boost(
        &mut self,
        date: NaiveDate,
        boosted_attributes: AttributeSet,
    ) -> Result<(), DomainError> {
        let boosted_rating = OverallRating::new(OverallRating::MAX)?;
        self.add_historical_rating(HistoricalRatingPeriod::new(
            RatingKind::Boost,
            date,
            None,
            boosted_rating,
            boosted_attributes.clone(),
        )?)?;
        self.attributes = boosted_attributes;
        Ok(())
    }

    /// Ends the open boost on `date` and restores the regular attributes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `date` is not after the boost start.
    pub fn remove_boost(
        &mut self,
        date: NaiveDate,
        normal_attributes: AttributeSet,
    ) -> Result<(), DomainError> {
        if let Some(boost) = self.open_period_mut(RatingKind::Boost) {
            boost.end(date)?;
        }
        self.attributes = normal_attributes;
        Ok(())
    }

    /// Starts a temporary rating on `date`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a temporary rating already starts on `date`.
    pub fn set_temporary_rating(
        &mut self,
        date: NaiveDate,
        temporary_rating: OverallRating,
    ) -> Result<(), DomainError> {
        self.add_historical_rating(HistoricalRatingPeriod::new(
            RatingKind::Temporary,
            date,
            None,
            temporary_rating,
            self.attributes.clone(),
        )?)
    }

    /// Ends the open temporary rating on `date`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `date` is not after its start.
    pub fn remove_temporary_rating(&mut self, date: NaiveDate) -> Result<(), DomainError> {
        if let Some(temporary) = self.open_period_mut(RatingKind::Temporary) {
            temporary.end(date)?;
        }
        Ok(())
    }

    fn open_period_mut(&mut self, kind: RatingKind) -> Option<&mut HistoricalRatingPeriod> {
        self.historical_ratings
            .iter_mut()
            .filter(|rating| rating.kind() == kind && rating.is_open())
            .max_by_key(|rating| rating.start_date())
    }
}
