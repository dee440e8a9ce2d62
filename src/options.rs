//! Engine configuration
//!
//! Every tunable constant of the model lives in [EngineOptions], so there is a
//! single place where distribution ratios, elimination rates, the absorption
//! window and the danger thresholds are defined.

use serde::{Deserialize, Serialize};

use crate::data::{DrinkingFrequency, Gender};
use crate::error::{ensure_positive, BacError, Result};
use crate::model::DangerThresholds;

// ============================================================================
// Elimination rate
// ============================================================================

/// Source of the elimination rate β (g/L per hour)
///
/// The rate is resolved once per profile, before any evaluation, so every
/// drink of a calculation is eliminated at the same rate.
pub trait EliminationRateProvider {
    fn elimination_rate(&self, frequency: DrinkingFrequency) -> f64;
}

/// Elimination rates by drinking frequency, in g/L per hour
///
/// Regular drinkers metabolize ethanol faster. The defaults span the commonly
/// cited 0.15 to 0.20 g/L/h range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EliminationRates {
    pub rarely: f64,
    pub occasionally: f64,
    pub regularly: f64,
    pub frequently: f64,
}

impl Default for EliminationRates {
    fn default() -> Self {
        Self {
            rarely: 0.15,
            occasionally: 0.16,
            regularly: 0.18,
            frequently: 0.20,
        }
    }
}

impl EliminationRateProvider for EliminationRates {
    fn elimination_rate(&self, frequency: DrinkingFrequency) -> f64 {
        match frequency {
            DrinkingFrequency::Rarely => self.rarely,
            DrinkingFrequency::Occasionally => self.occasionally,
            DrinkingFrequency::Regularly => self.regularly,
            DrinkingFrequency::Frequently => self.frequently,
        }
    }
}

/// A fixed rate regardless of drinking frequency
impl EliminationRateProvider for f64 {
    fn elimination_rate(&self, _frequency: DrinkingFrequency) -> f64 {
        *self
    }
}

// ============================================================================
// Distribution and food
// ============================================================================

/// Widmark distribution ratio `r` by gender
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionRatios {
    pub male: f64,
    pub female: f64,
}

impl Default for DistributionRatios {
    fn default() -> Self {
        Self {
            male: 0.68,
            female: 0.55,
        }
    }
}

impl DistributionRatios {
    pub fn ratio(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }
}

/// Shape of the food absorption effect
///
/// A food's effect rises from nothing to its full `absorption_factor` over a
/// rise window, then fades back out until `horizon_hours` after the meal. The
/// rise window grows linearly with how strong the food is, from
/// `min_rise_hours` for a factor of 1.0 to `max_rise_hours` for a factor
/// approaching 0.
///
/// Only the most recent food before a drink is considered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodModel {
    pub horizon_hours: f64,
    pub min_rise_hours: f64,
    pub max_rise_hours: f64,
}

impl Default for FoodModel {
    fn default() -> Self {
        Self {
            horizon_hours: 4.0,
            min_rise_hours: 0.5,
            max_rise_hours: 2.0,
        }
    }
}

impl FoodModel {
    /// Hours from eating until the food reaches its full effect
    pub fn hours_to_peak(&self, absorption_factor: f64) -> f64 {
        let strength = (1.0 - absorption_factor).clamp(0.0, 1.0);
        (self.min_rise_hours + strength * (self.max_rise_hours - self.min_rise_hours))
            .min(self.horizon_hours)
    }
}

// ============================================================================
// Engine options
// ============================================================================

/// Upper bound on [EngineOptions::default_window_hours], one week
pub const MAX_WINDOW_HOURS: f64 = 24.0 * 7.0;

/// Complete engine configuration
///
/// All concentrations are in g/L and all durations in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Widmark distribution ratios (default: 0.68 male, 0.55 female)
    pub distribution: DistributionRatios,
    /// Elimination rate table
    pub elimination: EliminationRates,
    /// Time for a drink to be fully absorbed (default: 0.75 h)
    pub absorption_window_hours: f64,
    /// Food absorption effect
    pub food: FoodModel,
    /// Danger level thresholds
    pub thresholds: DangerThresholds,
    /// Legal driving limit (default: 0.5 g/L)
    pub legal_limit: f64,
    /// Ceiling applied to values shown on gauges (default: 1.5 g/L)
    pub display_ceiling: f64,
    /// Sampling window used when a series is requested with `end <= start` (default: 6 h)
    pub default_window_hours: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            distribution: DistributionRatios::default(),
            elimination: EliminationRates::default(),
            absorption_window_hours: 0.75,
            food: FoodModel::default(),
            thresholds: DangerThresholds::default(),
            legal_limit: 0.5,
            display_ceiling: 1.5,
            default_window_hours: 6.0,
        }
    }
}

impl EngineOptions {
    /// Parse options from JSON; missing fields take their default
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the elimination rate table
    pub fn with_elimination(mut self, rates: EliminationRates) -> Self {
        self.elimination = rates;
        self
    }

    /// Set the absorption window
    pub fn with_absorption_window(mut self, hours: f64) -> Self {
        self.absorption_window_hours = hours;
        self
    }

    /// Set the food model
    pub fn with_food_model(mut self, food: FoodModel) -> Self {
        self.food = food;
        self
    }

    /// Set the danger thresholds
    pub fn with_thresholds(mut self, thresholds: DangerThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the legal limit used by time-to-legal projections
    pub fn with_legal_limit(mut self, limit: f64) -> Self {
        self.legal_limit = limit;
        self
    }

    /// Set the display ceiling
    pub fn with_display_ceiling(mut self, ceiling: f64) -> Self {
        self.display_ceiling = ceiling;
        self
    }

    /// Check that every value is in its domain
    pub fn validate(&self) -> Result<()> {
        ensure_positive("distribution.male", self.distribution.male)?;
        ensure_positive("distribution.female", self.distribution.female)?;
        ensure_positive("elimination.rarely", self.elimination.rarely)?;
        ensure_positive("elimination.occasionally", self.elimination.occasionally)?;
        ensure_positive("elimination.regularly", self.elimination.regularly)?;
        ensure_positive("elimination.frequently", self.elimination.frequently)?;
        if !self.absorption_window_hours.is_finite() || self.absorption_window_hours < 0.0 {
            return Err(BacError::invalid(
                "absorption_window_hours",
                self.absorption_window_hours,
            ));
        }
        ensure_positive("food.horizon_hours", self.food.horizon_hours)?;
        if !(self.food.min_rise_hours >= 0.0
            && self.food.max_rise_hours >= self.food.min_rise_hours
            && self.food.max_rise_hours.is_finite())
        {
            return Err(BacError::invalid(
                "food.rise_hours",
                format!("{}..{}", self.food.min_rise_hours, self.food.max_rise_hours),
            ));
        }
        self.thresholds.validate()?;
        if !self.legal_limit.is_finite() || self.legal_limit < 0.0 {
            return Err(BacError::invalid("legal_limit", self.legal_limit));
        }
        ensure_positive("display_ceiling", self.display_ceiling)?;
        ensure_positive("default_window_hours", self.default_window_hours)?;
        if self.default_window_hours > MAX_WINDOW_HOURS {
            return Err(BacError::invalid(
                "default_window_hours",
                self.default_window_hours,
            ));
        }
        Ok(())
    }
}
