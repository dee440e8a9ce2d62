//! Time-series sampling of the BAC curve for charts
//!
//! A series is a finite, ordered list of [BacSample]s. Each sample is computed
//! independently from the aggregate model, so a series is identical whatever
//! its density or the order in which its points are evaluated, and the
//! parallel sampler returns exactly the serial result.

use chrono::{DateTime, Duration, TimeDelta, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{hours_between, DrinkEvent, FoodEvent};
use crate::error::{BacError, Result};
use crate::model::{classify_danger, total_bac, Body, DangerLevel};
use crate::options::EngineOptions;

/// A single point of the BAC curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacSample {
    pub time: DateTime<Utc>,
    /// BAC in g/L
    pub bac: f64,
    pub danger_level: DangerLevel,
}

/// An ordered, non-empty series of [BacSample]s
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacSeries {
    samples: Vec<BacSample>,
}

impl BacSeries {
    pub fn samples(&self) -> &[BacSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BacSample> {
        self.samples.iter()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.samples.first().map(|s| s.time)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.samples.last().map(|s| s.time)
    }

    /// The sample with the highest BAC; the earliest one on ties
    pub fn peak(&self) -> Option<&BacSample> {
        self.samples
            .iter()
            .fold(None, |best: Option<&BacSample>, sample| match best {
                Some(b) if b.bac >= sample.bac => Some(b),
                _ => Some(sample),
            })
    }

    /// Highest danger level reached in the series
    pub fn max_danger_level(&self) -> DangerLevel {
        self.samples
            .iter()
            .map(|s| s.danger_level)
            .max()
            .unwrap_or(DangerLevel::Safe)
    }

    /// Hours spent above `threshold`
    ///
    /// Linear interpolation between samples, with the crossing point
    /// interpolated when a segment crosses the threshold.
    pub fn time_above(&self, threshold: f64) -> f64 {
        self.samples
            .windows(2)
            .map(|w| {
                let (a, b) = (&w[0], &w[1]);
                let dt = hours_between(a.time, b.time);
                let (above_a, above_b) = (a.bac > threshold, b.bac > threshold);
                match (above_a, above_b) {
                    (true, true) => dt,
                    (false, false) => 0.0,
                    (true, false) => dt * (a.bac - threshold) / (a.bac - b.bac),
                    (false, true) => dt * (b.bac - threshold) / (b.bac - a.bac),
                }
            })
            .sum()
    }

    /// The `(time, bac)` pairs of the series, for chart components
    pub fn points(&self) -> Vec<(DateTime<Utc>, f64)> {
        self.samples.iter().map(|s| (s.time, s.bac)).collect()
    }
}

impl<'a> IntoIterator for &'a BacSeries {
    type Item = &'a BacSample;
    type IntoIter = std::slice::Iter<'a, BacSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Sample times from `start` to `end`
///
/// Points are spaced `interval_minutes` apart starting at `start`, and a final
/// point is placed at `end` itself, giving `ceil((end - start) / interval) + 1`
/// points. When `end <= start` the window is extended to
/// [EngineOptions::default_window_hours].
pub fn sample_times(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval_minutes: u32,
    options: &EngineOptions,
) -> Result<Vec<DateTime<Utc>>> {
    if interval_minutes == 0 {
        return Err(BacError::invalid("interval_minutes", interval_minutes));
    }
    let end = if end <= start {
        let fallback = hours_after(start, options.default_window_hours)
            .ok_or_else(|| BacError::invalid("default_window_hours", options.default_window_hours))?;
        tracing::debug!(
            start = %start,
            requested_end = %end,
            end = %fallback,
            "series end not after start, using default window"
        );
        fallback
    } else {
        end
    };

    let interval = Duration::minutes(i64::from(interval_minutes));
    let mut times = Vec::new();
    let mut time = start;
    while time < end {
        times.push(time);
        time = match time.checked_add_signed(interval) {
            Some(next) => next,
            None => break,
        };
    }
    times.push(end);
    Ok(times)
}

/// `start + hours` for a positive `hours`, or `None` when the result is not a
/// representable time
fn hours_after(start: DateTime<Utc>, hours: f64) -> Option<DateTime<Utc>> {
    let millis = hours * 3_600_000.0;
    if !(millis > 0.0 && millis < i64::MAX as f64) {
        return None;
    }
    TimeDelta::try_milliseconds(millis as i64).and_then(|delta| start.checked_add_signed(delta))
}

fn sample_at(
    time: DateTime<Utc>,
    drinks: &[DrinkEvent],
    body: &Body,
    foods: &[FoodEvent],
    options: &EngineOptions,
) -> BacSample {
    let bac = total_bac(drinks, body, foods, time, options);
    BacSample {
        time,
        bac,
        danger_level: classify_danger(bac, &options.thresholds),
    }
}

/// Sample the BAC curve between `start` and `end`, see [sample_times]
pub fn sample_series(
    drinks: &[DrinkEvent],
    body: &Body,
    foods: &[FoodEvent],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval_minutes: u32,
    options: &EngineOptions,
) -> Result<BacSeries> {
    let samples = sample_times(start, end, interval_minutes, options)?
        .into_iter()
        .map(|time| sample_at(time, drinks, body, foods, options))
        .collect();
    Ok(BacSeries { samples })
}

/// Same as [sample_series], evaluating the points in parallel
pub fn sample_series_par(
    drinks: &[DrinkEvent],
    body: &Body,
    foods: &[FoodEvent],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval_minutes: u32,
    options: &EngineOptions,
) -> Result<BacSeries> {
    let samples = sample_times(start, end, interval_minutes, options)?
        .into_par_iter()
        .map(|time| sample_at(time, drinks, body, foods, options))
        .collect();
    Ok(BacSeries { samples })
}
