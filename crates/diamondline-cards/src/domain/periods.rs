//! Historical rating periods.

use chrono::NaiveDate;
use diamondline_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::attributes::AttributeSet;
use super::values::OverallRating;

/// What kind of rating a period records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingKind {
    /// The card's regular rating, produced by roster updates.
    Baseline,
    /// A short-lived rating bump driven by match-ups.
    Temporary,
    /// A boost that maxes out the card for a limited time.
    Boost,
}

/// A rating and attribute snapshot valid for the half-open interval
/// `[start_date, end_date)`. An absent end date means the period is current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalRatingPeriod {
    kind: RatingKind,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    overall_rating: OverallRating,
    attributes: AttributeSet,
}

impl HistoricalRatingPeriod {
    /// Creates a period of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `end_date` is not after `start_date`.
    pub fn new(
        kind: RatingKind,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        overall_rating: OverallRating,
        attributes: AttributeSet,
    ) -> Result<Self, DomainError> {
        if let Some(end) = end_date {
            if end <= start_date {
                return Err(DomainError::Validation(format!(
                    "rating period ending {end} must end after its start {start_date}"
                )));
            }
        }
        Ok(Self {
            kind,
            start_date,
            end_date,
            overall_rating,
            attributes,
        })
    }

    /// Creates a baseline period.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `end_date` is not after `start_date`.
    pub fn baseline(
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        overall_rating: OverallRating,
        attributes: AttributeSet,
    ) -> Result<Self, DomainError> {
        Self::new(
            RatingKind::Baseline,
            start_date,
            end_date,
            overall_rating,
            attributes,
        )
    }

    /// Closes an open period at `date`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the period is already closed or
    /// `date` is not after the start date.
    pub fn end(&mut self, date: NaiveDate) -> Result<(), DomainError> {
        if self.end_date.is_some() {
            return Err(DomainError::Validation(format!(
                "rating period starting {} is already closed",
                self.start_date
            )));
        }
        if date <= self.start_date {
            return Err(DomainError::Validation(format!(
                "rating period starting {} cannot end on {date}",
                self.start_date
            )));
        }
        self.end_date = Some(date);
        Ok(())
    }

    #[must_use]
    pub fn kind(&self) -> RatingKind {
        self.kind
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    #[must_use]
    pub fn overall_rating(&self) -> OverallRating {
        self.overall_rating
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Returns `true` if the period has no end date.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// Returns `true` if `date` falls within `[start_date, end_date)`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.is_none_or(|end| date < end)
    }
}
