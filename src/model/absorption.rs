use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{hours_between, FoodEvent};
use crate::options::FoodModel;

/// Where a food's effect is on its curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodPhase {
    /// No food in effect
    None,
    /// Effect is building towards the food's factor
    Rising,
    /// Effect is fading back towards no effect
    Falling,
}

/// The food multiplier at a given time, with its phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodEffect {
    pub factor: f64,
    pub phase: FoodPhase,
}

impl FoodEffect {
    const NONE: FoodEffect = FoodEffect {
        factor: 1.0,
        phase: FoodPhase::None,
    };
}

/// Food effect at `at_time`
///
/// Only foods consumed at or before `at_time` are considered, and only the
/// most recent of those has an effect. The effect moves linearly from 1.0 to
/// the food's `absorption_factor` over [FoodModel::hours_to_peak], then back
/// to 1.0 at [FoodModel::horizon_hours].
pub fn food_effect(foods: &[FoodEvent], at_time: DateTime<Utc>, model: &FoodModel) -> FoodEffect {
    let latest = foods
        .iter()
        .filter(|food| food.consumed_at() <= at_time)
        .max_by_key(|food| food.consumed_at());

    let food = match latest {
        Some(food) => food,
        None => return FoodEffect::NONE,
    };

    let hours_since = hours_between(food.consumed_at(), at_time);
    if hours_since > model.horizon_hours {
        return FoodEffect::NONE;
    }

    let reduction = 1.0 - food.absorption_factor();
    let hours_to_peak = model.hours_to_peak(food.absorption_factor());

    if hours_since <= hours_to_peak {
        let progress = if hours_to_peak > 0.0 {
            hours_since / hours_to_peak
        } else {
            1.0
        };
        FoodEffect {
            factor: 1.0 - reduction * progress,
            phase: FoodPhase::Rising,
        }
    } else {
        // hours_to_peak < hours_since <= horizon, so the span is positive
        let fade = (hours_since - hours_to_peak) / (model.horizon_hours - hours_to_peak);
        FoodEffect {
            factor: 1.0 - reduction * (1.0 - fade),
            phase: FoodPhase::Falling,
        }
    }
}

/// Food multiplier in (0, 1] at `at_time`, see [food_effect]
pub fn food_factor(foods: &[FoodEvent], at_time: DateTime<Utc>, model: &FoodModel) -> f64 {
    food_effect(foods, at_time, model).factor
}
