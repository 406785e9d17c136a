//! Engine configuration.

use chrono::NaiveDate;
use diamondline_cards::domain::values::SeasonYear;
use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// Tunables for the reconciliation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Month (1-12) of the first day of every season.
    pub season_start_month: u32,
    /// Day of month of the first day of every season.
    pub season_start_day: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            season_start_month: 1,
            season_start_day: 1,
        }
    }
}

impl ReconcileConfig {
    /// Returns the first day of `season`, the floor of every reconstructed
    /// history.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::InvalidSeasonStart` if the configured month
    /// and day do not form a date in that year.
    pub fn season_start(&self, season: SeasonYear) -> Result<NaiveDate, ReconcileError> {
        NaiveDate::from_ymd_opt(
            i32::from(season.value()),
            self.season_start_month,
            self.season_start_day,
        )
        .ok_or(ReconcileError::InvalidSeasonStart {
            season,
            month: self.season_start_month,
            day: self.season_start_day,
        })
    }
}
