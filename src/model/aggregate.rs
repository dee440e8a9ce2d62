use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{hours_between, DrinkEvent, FoodEvent};
use crate::error::{BacError, Result};
use crate::model::dose::{dose_curve, peak_bac};
use crate::model::Body;
use crate::options::EngineOptions;

/// Total BAC (g/L) at `at_time`
///
/// The sum of [dose_contribution](crate::model::dose::dose_contribution) over
/// every drink consumed at or before `at_time`. Later drinks are ignored, an
/// empty drink list gives 0. The result is not capped; see [display_bac].
pub fn total_bac(
    drinks: &[DrinkEvent],
    body: &Body,
    foods: &[FoodEvent],
    at_time: DateTime<Utc>,
    options: &EngineOptions,
) -> f64 {
    total_bac_offset(drinks, body, foods, at_time, 0.0, options)
}

/// Total BAC `offset_hours` after `reference`, counting only drinks consumed
/// at or before `reference`
///
/// Used by projections, which assume no further drinks are logged.
pub(crate) fn total_bac_offset(
    drinks: &[DrinkEvent],
    body: &Body,
    foods: &[FoodEvent],
    reference: DateTime<Utc>,
    offset_hours: f64,
    options: &EngineOptions,
) -> f64 {
    drinks
        .iter()
        .filter(|drink| drink.consumed_at() <= reference)
        .map(|drink| {
            let elapsed = hours_between(drink.consumed_at(), reference) + offset_hours;
            dose_curve(
                peak_bac(drink, body, foods, options),
                elapsed,
                options.absorption_window_hours,
                body.elimination_rate,
            )
        })
        .sum()
}

/// Clamp a BAC value for gauges and widgets
pub fn display_bac(bac: f64, ceiling: f64) -> f64 {
    bac.clamp(0.0, ceiling)
}

// ============================================================================
// Danger levels
// ============================================================================

/// Ordered classification of a BAC value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DangerLevel {
    Safe,
    Caution,
    Warning,
    Danger,
    Critical,
}

impl DangerLevel {
    pub const ALL: [DangerLevel; 5] = [
        DangerLevel::Safe,
        DangerLevel::Caution,
        DangerLevel::Warning,
        DangerLevel::Danger,
        DangerLevel::Critical,
    ];
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DangerLevel::Safe => "safe",
            DangerLevel::Caution => "caution",
            DangerLevel::Warning => "warning",
            DangerLevel::Danger => "danger",
            DangerLevel::Critical => "critical",
        };
        write!(f, "{}", label)
    }
}

/// Lower bounds (g/L) of each level above [DangerLevel::Safe]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DangerThresholds {
    pub caution: f64,
    pub warning: f64,
    pub danger: f64,
    pub critical: f64,
}

impl Default for DangerThresholds {
    fn default() -> Self {
        Self {
            caution: 0.5,
            warning: 0.8,
            danger: 1.5,
            critical: 2.0,
        }
    }
}

impl DangerThresholds {
    /// Thresholds must be finite, non-negative and strictly increasing
    pub fn validate(&self) -> Result<()> {
        let bounds = [self.caution, self.warning, self.danger, self.critical];
        let ordered = bounds.windows(2).all(|w| w[0] < w[1]);
        if !ordered || bounds.iter().any(|b| !b.is_finite() || *b < 0.0) {
            return Err(BacError::invalid("thresholds", format!("{:?}", bounds)));
        }
        Ok(())
    }

    /// Lower bound of `level`
    pub fn lower_bound(&self, level: DangerLevel) -> f64 {
        match level {
            DangerLevel::Safe => 0.0,
            DangerLevel::Caution => self.caution,
            DangerLevel::Warning => self.warning,
            DangerLevel::Danger => self.danger,
            DangerLevel::Critical => self.critical,
        }
    }
}

/// Map a BAC value to its [DangerLevel]
pub fn classify_danger(bac: f64, thresholds: &DangerThresholds) -> DangerLevel {
    DangerLevel::ALL
        .iter()
        .rev()
        .copied()
        .find(|level| bac >= thresholds.lower_bound(*level))
        .unwrap_or(DangerLevel::Safe)
}
