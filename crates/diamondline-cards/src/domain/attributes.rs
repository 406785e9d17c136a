//! The attribute vector underlying a card's overall rating, and signed
//! deltas between two attribute states.
//!
//! Both types travel over the wire as a map keyed by attribute name.
//! An attribute set must name every attribute; a delta may omit attributes
//! that did not change.

use std::collections::BTreeMap;

use diamondline_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Number of attributes tracked per card.
pub const ATTRIBUTE_COUNT: usize = 28;

/// One individual skill rating of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Stamina,
    PitchingClutch,
    HitsPerBf,
    KPerBf,
    BbPerBf,
    HrPerBf,
    PitchVelocity,
    PitchControl,
    PitchMovement,
    ContactLeft,
    ContactRight,
    PowerLeft,
    PowerRight,
    PlateVision,
    PlateDiscipline,
    BattingClutch,
    BuntingAbility,
    DragBuntingAbility,
    HittingDurability,
    FieldingDurability,
    FieldingAbility,
    ArmStrength,
    ArmAccuracy,
    ReactionTime,
    Blocking,
    Speed,
    BaseRunningAbility,
    BaseRunningAggression,
}

impl Attribute {
    /// Every attribute, in storage order.
    pub const ALL: [Self; ATTRIBUTE_COUNT] = [
        Self::Stamina,
        Self::PitchingClutch,
        Self::HitsPerBf,
        Self::KPerBf,
        Self::BbPerBf,
        Self::HrPerBf,
        Self::PitchVelocity,
        Self::PitchControl,
        Self::PitchMovement,
        Self::ContactLeft,
        Self::ContactRight,
        Self::PowerLeft,
        Self::PowerRight,
        Self::PlateVision,
        Self::PlateDiscipline,
        Self::BattingClutch,
        Self::BuntingAbility,
        Self::DragBuntingAbility,
        Self::HittingDurability,
        Self::FieldingDurability,
        Self::FieldingAbility,
        Self::ArmStrength,
        Self::ArmAccuracy,
        Self::ReactionTime,
        Self::Blocking,
        Self::Speed,
        Self::BaseRunningAbility,
        Self::BaseRunningAggression,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// A complete attribute state. Every value lies in `0..=125`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Attribute, i32>",
    into = "BTreeMap<Attribute, i32>"
)]
pub struct AttributeSet {
    values: [i32; ATTRIBUTE_COUNT],
}

impl AttributeSet {
    /// The lowest value an attribute can hold.
    pub const MIN_VALUE: i32 = 0;
    /// The highest value an attribute can hold.
    pub const MAX_VALUE: i32 = 125;

    /// Creates an attribute set from values in [`Attribute::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if any value is out of range.
    pub fn from_values(values: [i32; ATTRIBUTE_COUNT]) -> Result<Self, DomainError> {
        for attribute in Attribute::ALL {
            let value = values[attribute.index()];
            if !(Self::MIN_VALUE..=Self::MAX_VALUE).contains(&value) {
                return Err(DomainError::Validation(format!(
                    "attribute {attribute:?} value {value} is not between {} and {}",
                    Self::MIN_VALUE,
                    Self::MAX_VALUE
                )));
            }
        }
        Ok(Self { values })
    }

    /// Creates an attribute set where every attribute has the same value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `value` is out of range.
    pub fn uniform(value: i32) -> Result<Self, DomainError> {
        Self::from_values([value; ATTRIBUTE_COUNT])
    }

    /// Returns a copy with one attribute replaced.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `value` is out of range.
    pub fn with(&self, attribute: Attribute, value: i32) -> Result<Self, DomainError> {
        let mut values = self.values;
        values[attribute.index()] = value;
        Self::from_values(values)
    }

    /// Returns the value of one attribute.
    #[must_use]
    pub fn get(&self, attribute: Attribute) -> i32 {
        self.values[attribute.index()]
    }
}

impl TryFrom<BTreeMap<Attribute, i32>> for AttributeSet {
    type Error = DomainError;

    fn try_from(map: BTreeMap<Attribute, i32>) -> Result<Self, Self::Error> {
        let mut values = [0; ATTRIBUTE_COUNT];
        for attribute in Attribute::ALL {
            values[attribute.index()] = *map.get(&attribute).ok_or_else(|| {
                DomainError::Validation(format!("attribute {attribute:?} is missing"))
            })?;
        }
        Self::from_values(values)
    }
}

impl From<AttributeSet> for BTreeMap<Attribute, i32> {
    fn from(set: AttributeSet) -> Self {
        Attribute::ALL
            .into_iter()
            .map(|attribute| (attribute, set.get(attribute)))
            .collect()
    }
}

/// A signed change to every attribute between two points in time.
///
/// For a recorded change, `old + delta = new` must hold exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Attribute, i32>", into = "BTreeMap<Attribute, i32>")]
pub struct AttributeChanges {
    deltas: [i32; ATTRIBUTE_COUNT],
}

impl AttributeChanges {
    /// A delta that changes nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns a copy with the delta for one attribute replaced.
    #[must_use]
    pub fn with(mut self, attribute: Attribute, delta: i32) -> Self {
        self.deltas[attribute.index()] = delta;
        self
    }

    /// Returns the delta for one attribute.
    #[must_use]
    pub fn get(&self, attribute: Attribute) -> i32 {
        self.deltas[attribute.index()]
    }

    /// Returns `true` if no attribute changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.iter().all(|delta| *delta == 0)
    }

    /// Adds this delta to `state`, yielding the state after the change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a resulting value is out of range.
    pub fn apply_to(&self, state: &AttributeSet) -> Result<AttributeSet, DomainError> {
        self.combine(state, i32::checked_add)
    }

    /// Subtracts this delta from `state`, yielding the state before the change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a resulting value is out of range.
    pub fn subtract_from(&self, state: &AttributeSet) -> Result<AttributeSet, DomainError> {
        self.combine(state, i32::checked_sub)
    }

    fn combine(
        &self,
        state: &AttributeSet,
        op: fn(i32, i32) -> Option<i32>,
    ) -> Result<AttributeSet, DomainError> {
        let mut values = state.values;
        for (attribute, (value, delta)) in Attribute::ALL
            .into_iter()
            .zip(values.iter_mut().zip(self.deltas))
        {
            let current = *value;
            *value = op(current, delta).ok_or_else(|| {
                DomainError::Validation(format!(
                    "attribute {attribute:?} delta {delta} overflows value {current}"
                ))
            })?;
        }
        AttributeSet::from_values(values)
    }
}

impl From<BTreeMap<Attribute, i32>> for AttributeChanges {
    fn from(map: BTreeMap<Attribute, i32>) -> Self {
        map.into_iter()
            .fold(Self::none(), |changes, (attribute, delta)| {
                changes.with(attribute, delta)
            })
    }
}

impl From<AttributeChanges> for BTreeMap<Attribute, i32> {
    fn from(changes: AttributeChanges) -> Self {
        Attribute::ALL
            .into_iter()
            .map(|attribute| (attribute, changes.get(attribute)))
            .filter(|(_, delta)| *delta != 0)
            .collect()
    }
}
