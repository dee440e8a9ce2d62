//! The Widmark-based estimation model
//!
//! The model is built from four pure layers:
//!
//! | Layer | Function | Output |
//! |-------|----------|--------|
//! | Unit conversion | [units::alcohol_grams] | grams of ethanol |
//! | Food absorption | [absorption::food_factor] | multiplier in (0, 1] |
//! | Single dose | [dose::dose_contribution] | one drink's BAC (g/L) |
//! | Aggregate | [aggregate::total_bac] | total BAC (g/L) |
//!
//! A single drink follows a linear absorption ramp up to its peak, then a
//! zero-order elimination at rate β until it reaches zero:
//!
//! ```text
//!  BAC
//!   |      peak
//!   |      /\
//!   |     /  \
//!   |    /    \ slope -β
//!   |   /      \
//!   |__/________\______ t
//!     t0  t0+w
//! ```
//!
//! The total is the superposition of all drinks consumed at or before the
//! query time. Each drink is eliminated exactly once, on its own curve.

pub mod absorption;
pub mod aggregate;
pub mod dose;
pub mod units;

pub use absorption::{food_effect, food_factor, FoodEffect, FoodPhase};
pub use aggregate::{classify_danger, display_bac, total_bac, DangerLevel, DangerThresholds};
pub use dose::{dose_contribution, peak_bac};
pub use units::alcohol_grams;

use serde::{Deserialize, Serialize};

use crate::data::Profile;
use crate::error::{ensure_positive, Result};
use crate::options::{EliminationRateProvider, EngineOptions};

/// Profile-derived constants of a calculation
///
/// Resolved once from a [Profile] so that every drink of an evaluation uses
/// the same distribution ratio and elimination rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Body weight in kg
    pub weight_kg: f64,
    /// Widmark distribution ratio `r`
    pub distribution_ratio: f64,
    /// Elimination rate β in g/L per hour
    pub elimination_rate: f64,
}

impl Body {
    /// Resolve with the elimination rate table of `options`
    pub fn resolve(profile: &Profile, options: &EngineOptions) -> Result<Self> {
        Self::resolve_with(profile, options, &options.elimination)
    }

    /// Resolve with a custom [EliminationRateProvider]
    pub fn resolve_with<P: EliminationRateProvider + ?Sized>(
        profile: &Profile,
        options: &EngineOptions,
        provider: &P,
    ) -> Result<Self> {
        let weight_kg = ensure_positive("weight_kg", profile.weight_kg())?;
        let distribution_ratio = ensure_positive(
            "distribution_ratio",
            options.distribution.ratio(profile.gender()),
        )?;
        let elimination_rate = ensure_positive(
            "elimination_rate",
            provider.elimination_rate(profile.drinking_frequency()),
        )?;
        Ok(Body {
            weight_kg,
            distribution_ratio,
            elimination_rate,
        })
    }

    /// Litres-equivalent of body mass alcohol distributes through, `weight * r`
    #[inline]
    pub fn distribution_volume(&self) -> f64 {
        self.weight_kg * self.distribution_ratio
    }
}
