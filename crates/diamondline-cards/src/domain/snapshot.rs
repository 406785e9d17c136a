//! The current state of a card as published by the external catalog.

use serde::{Deserialize, Serialize};

use super::attributes::AttributeSet;
use super::values::{CardExternalId, CardName, OverallRating, Position, SeasonYear};

/// Read-only view of a card in the external catalog, refreshed per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCardSnapshot {
    pub season: SeasonYear,
    pub external_id: CardExternalId,
    pub name: CardName,
    pub position: Position,
    pub overall_rating: OverallRating,
    pub attributes: AttributeSet,
    /// Why the card is boosted, if it is.
    #[serde(default)]
    pub boost_reason: Option<String>,
    #[serde(default)]
    pub temporary_overall_rating: Option<OverallRating>,
}

impl ExternalCardSnapshot {
    /// Returns `true` if the catalog reports an active boost.
    #[must_use]
    pub fn is_boosted(&self) -> bool {
        self.boost_reason
            .as_deref()
            .is_some_and(|reason| !reason.trim().is_empty())
    }

    /// Returns `true` if the catalog reports a temporary rating.
    #[must_use]
    pub fn has_temporary_rating(&self) -> bool {
        self.temporary_overall_rating.is_some()
    }
}
