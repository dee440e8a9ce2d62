use chrono::{DateTime, Utc};

use crate::data::{hours_between, DrinkEvent, FoodEvent};
use crate::model::absorption::food_factor;
use crate::model::Body;
use crate::options::EngineOptions;

/// Highest BAC (g/L) a single drink reaches
///
/// Widmark: `grams / (weight_kg * r)`, scaled by the food factor at the time
/// the drink was consumed. Food eaten after the drink has no effect on it.
pub fn peak_bac(
    drink: &DrinkEvent,
    body: &Body,
    foods: &[FoodEvent],
    options: &EngineOptions,
) -> f64 {
    let factor = food_factor(foods, drink.consumed_at(), &options.food);
    drink.alcohol_grams() / body.distribution_volume() * factor
}

/// BAC curve of a single dose, `elapsed` hours after it was consumed
///
/// Linear ramp from 0 to `peak` over `window` hours, then linear elimination at
/// `elimination_rate`, floored at 0.
#[inline]
pub(crate) fn dose_curve(peak: f64, elapsed: f64, window: f64, elimination_rate: f64) -> f64 {
    if elapsed < 0.0 {
        return 0.0;
    }
    if elapsed < window {
        return peak * elapsed / window;
    }
    (peak - elimination_rate * (elapsed - window)).max(0.0)
}

/// Hours after consumption at which a dose of `peak` is fully eliminated
#[inline]
pub(crate) fn clearance_hours(peak: f64, window: f64, elimination_rate: f64) -> f64 {
    window + peak / elimination_rate
}

/// Contribution of one drink to the total BAC at `at_time`, in g/L
///
/// Zero before the drink was consumed and after it has been eliminated.
pub fn dose_contribution(
    drink: &DrinkEvent,
    body: &Body,
    foods: &[FoodEvent],
    at_time: DateTime<Utc>,
    options: &EngineOptions,
) -> f64 {
    let elapsed = hours_between(drink.consumed_at(), at_time);
    if elapsed < 0.0 {
        return 0.0;
    }
    let peak = peak_bac(drink, body, foods, options);
    dose_curve(
        peak,
        elapsed,
        options.absorption_window_hours,
        body.elimination_rate,
    )
}
