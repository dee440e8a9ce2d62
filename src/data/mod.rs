//! Profiles, logged events and sessions
//!
//! These are the plain records a session-storage collaborator hands to the
//! engine. All constructors validate their inputs, and deserialization goes
//! through the same validation, so an engine call never sees a non-positive
//! weight or volume.

pub mod builder;
pub mod event;
pub mod parser;
pub mod profile;
pub mod session;

pub use builder::SessionBuilder;
pub use event::{DrinkEvent, Event, FoodEvent, ETHANOL_DENSITY};
pub use profile::{DrinkingFrequency, Gender, Profile};
pub use session::Session;

use chrono::{DateTime, Utc};

/// Signed number of hours from `from` to `to`, at millisecond resolution
#[inline]
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}
