use argmin::{
    core::{CostFunction, Error, Executor},
    solver::brent::BrentRoot,
};
use chrono::{DateTime, Utc};

use crate::data::{hours_between, DrinkEvent, FoodEvent};
use crate::error::{BacError, Result};
use crate::model::aggregate::total_bac_offset;
use crate::model::dose::{clearance_hours, peak_bac};
use crate::model::Body;
use crate::options::EngineOptions;
use crate::projection::Hours;

/// Step used to search back for the last time the curve was above the threshold
const SEARCH_STEP_HOURS: f64 = 1.0 / 60.0;
const ROOT_TOLERANCE: f64 = 1e-9;
const MAX_ITERS: u64 = 100;

/// Distance between the projected BAC and a threshold, `offset` hours after `now`
struct ThresholdGap<'a> {
    drinks: &'a [DrinkEvent],
    body: &'a Body,
    foods: &'a [FoodEvent],
    now: DateTime<Utc>,
    threshold: f64,
    options: &'a EngineOptions,
}

impl ThresholdGap<'_> {
    fn at(&self, offset: f64) -> f64 {
        total_bac_offset(
            self.drinks,
            self.body,
            self.foods,
            self.now,
            offset,
            self.options,
        ) - self.threshold
    }
}

impl CostFunction for ThresholdGap<'_> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, offset: &Self::Param) -> std::result::Result<Self::Output, Error> {
        Ok(self.at(*offset))
    }
}

/// Hours from `now` until the projected BAC falls to `threshold` for good
///
/// Unlike [time_to_threshold](super::time_to_threshold), this follows the full
/// curve of every drink consumed at or before `now`, including drinks that are
/// still being absorbed. No further drinks are assumed.
///
/// Once every drink is absorbed the curve can only fall, so the crossing is
/// bracketed on that tail and refined with Brent's method. If the curve is
/// already below the threshold at that point, the last minute it was above is
/// searched for instead.
pub fn projected_crossing(
    drinks: &[DrinkEvent],
    body: &Body,
    foods: &[FoodEvent],
    now: DateTime<Utc>,
    threshold: f64,
    options: &EngineOptions,
) -> Result<Hours> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(BacError::invalid("threshold", threshold));
    }

    let window = options.absorption_window_hours;
    let mut absorbed = 0.0_f64;
    let mut cleared = 0.0_f64;
    for drink in drinks.iter().filter(|d| d.consumed_at() <= now) {
        let age = hours_between(drink.consumed_at(), now);
        let peak = peak_bac(drink, body, foods, options);
        absorbed = absorbed.max(window - age);
        cleared = cleared.max(clearance_hours(peak, window, body.elimination_rate) - age);
    }

    if cleared <= 0.0 {
        return Ok(Hours::ZERO);
    }
    if threshold == 0.0 {
        return Ok(Hours::new(cleared));
    }

    let gap = ThresholdGap {
        drinks,
        body,
        foods,
        now,
        threshold,
        options,
    };

    let (lo, hi) = if gap.at(absorbed) > 0.0 {
        (absorbed, cleared)
    } else {
        let mut hi = absorbed;
        loop {
            if hi <= 0.0 {
                return Ok(Hours::ZERO);
            }
            let lo = (hi - SEARCH_STEP_HOURS).max(0.0);
            if gap.at(lo) > 0.0 {
                break (lo, hi);
            }
            hi = lo;
        }
    };
    tracing::debug!(lo, hi, threshold, "bracketed threshold crossing");

    let solver = BrentRoot::new(lo, hi, ROOT_TOLERANCE);
    let res = Executor::new(gap, solver)
        .configure(|state| state.max_iters(MAX_ITERS))
        .run()
        .map_err(|e| BacError::Solver(e.to_string()))?;
    let root = res
        .state
        .param
        .ok_or_else(|| BacError::Solver("no root found".to_string()))?;
    Ok(Hours::new(root))
}
