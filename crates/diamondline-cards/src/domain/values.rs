//! Value objects for the card context.

use std::fmt;

use diamondline_core::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The game season (release year) a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonYear(u16);

impl SeasonYear {
    /// Creates a season year.
    #[must_use]
    pub const fn new(year: u16) -> Self {
        Self(year)
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for SeasonYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity the external catalog assigns to a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardExternalId(Uuid);

impl CardExternalId {
    /// Wraps an external UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CardExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A card's overall rating, constrained to `40..=99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OverallRating(u8);

impl OverallRating {
    /// The lowest rating a card can have.
    pub const MIN: u8 = 40;
    /// The highest rating a card can have.
    pub const MAX: u8 = 99;

    /// Creates an overall rating.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `value` is outside `40..=99`.
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::Validation(format!(
                "the overall rating of {value} is not between {} and {}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    /// Returns the numeric rating.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for OverallRating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OverallRating> for u8 {
    fn from(rating: OverallRating) -> Self {
        rating.0
    }
}

impl fmt::Display for OverallRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player's primary fielding position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "P")]
    Pitcher,
    #[serde(rename = "C")]
    Catcher,
    #[serde(rename = "1B")]
    FirstBase,
    #[serde(rename = "2B")]
    SecondBase,
    #[serde(rename = "3B")]
    ThirdBase,
    #[serde(rename = "SS")]
    Shortstop,
    #[serde(rename = "IF")]
    Infield,
    #[serde(rename = "LF")]
    LeftField,
    #[serde(rename = "CF")]
    CenterField,
    #[serde(rename = "RF")]
    RightField,
    #[serde(rename = "OF")]
    OutField,
    #[serde(rename = "DH")]
    DesignatedHitter,
    #[serde(rename = "TWP")]
    TwoWayPlayer,
    #[serde(rename = "SP")]
    StartingPitcher,
    #[serde(rename = "RP")]
    ReliefPitcher,
    #[serde(rename = "CP")]
    ClosingPitcher,
}

/// The display name of a card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardName(String);

impl CardName {
    /// Creates a card name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::Validation("card name must not be empty".into()));
        }
        Ok(Self(name))
    }

    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
