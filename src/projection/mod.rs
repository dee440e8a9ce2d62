//! Time-to-threshold projections
//!
//! The closed-form projections assume the BAC falls at the elimination rate
//! from now on:
//!
//! ```text
//! hours = max(0, (bac - threshold) / β)
//! ```
//!
//! [projected_crossing] instead follows the full curve, which matters while
//! recent drinks are still being absorbed.
//!
//! All projections are reported as [Hours], which rounds up to whole minutes
//! exactly once, so that a value never flickers between "0m" and "1m".

mod crossing;

pub use crossing::projected_crossing;

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, BacError, Result};

/// A projected duration in hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Hours(f64);

impl Hours {
    pub const ZERO: Hours = Hours(0.0);

    /// Wrap a non-negative number of hours; negative input becomes zero
    pub fn new(hours: f64) -> Self {
        Hours(hours.max(0.0))
    }

    pub fn hours(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.whole_minutes() == 0
    }

    /// Duration rounded up to whole minutes
    ///
    /// A tolerance of a microsecond absorbs floating point noise, so that
    /// exactly 30 minutes does not round to 31.
    pub fn whole_minutes(&self) -> i64 {
        let minutes = self.0 * 60.0 - 1e-8;
        minutes.ceil().max(0.0) as i64
    }

    /// As a [chrono::Duration] of whole minutes
    pub fn as_duration(&self) -> Duration {
        Duration::minutes(self.whole_minutes())
    }
}

/// Formats as `"Xh Ym"`, `"Ym"` or `"0m"`
impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.whole_minutes();
        let (h, m) = (minutes / 60, minutes % 60);
        if h > 0 {
            write!(f, "{}h {}m", h, m)
        } else {
            write!(f, "{}m", m)
        }
    }
}

/// Hours until `bac` falls to `threshold` at `elimination_rate` g/L/h
///
/// Zero when `bac` is already at or below the threshold.
pub fn time_to_threshold(bac: f64, threshold: f64, elimination_rate: f64) -> Result<Hours> {
    let elimination_rate = ensure_positive("elimination_rate", elimination_rate)?;
    if !bac.is_finite() || bac < 0.0 {
        return Err(BacError::invalid("bac", bac));
    }
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(BacError::invalid("threshold", threshold));
    }
    Ok(Hours::new((bac - threshold) / elimination_rate))
}

/// Hours until `bac` falls to the legal limit
pub fn time_to_legal_limit(bac: f64, legal_limit: f64, elimination_rate: f64) -> Result<Hours> {
    time_to_threshold(bac, legal_limit, elimination_rate)
}

/// Hours until `bac` reaches zero
pub fn time_to_zero(bac: f64, elimination_rate: f64) -> Result<Hours> {
    time_to_threshold(bac, 0.0, elimination_rate)
}
