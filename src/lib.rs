//! Blood alcohol concentration (BAC) estimation.
//!
//! `bacsol` converts a [Profile] and a chronological list of drink and food
//! events into a BAC estimate (g/L) at any point in time, following a
//! Widmark-based single-dose model superposed over all drinks.
//!
//! Every evaluation is a pure function of its inputs: there is no hidden
//! accumulator, so a value can be recomputed at any time point, in any order,
//! from any thread.
//!
//! ```rust
//! use bacsol::prelude::*;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
//! let profile = Profile::new(80.0, Gender::Male, 30.0, DrinkingFrequency::Occasionally).unwrap();
//! let session = Session::builder(profile, start)
//!     .drink(500.0, 5.0, start)
//!     .drink(500.0, 5.0, start + Duration::minutes(45))
//!     .build()
//!     .unwrap();
//!
//! let engine = Engine::default();
//! let snapshot = engine.snapshot(&session, start + Duration::hours(2)).unwrap();
//! assert!(snapshot.bac > 0.0);
//! ```

pub mod activity;
pub mod data;
pub mod error;
pub mod model;
pub mod options;
pub mod projection;
pub mod series;

mod engine;

pub use crate::data::*;
pub use crate::engine::Engine;
pub use crate::error::{BacError, Result};
pub use crate::model::{DangerLevel, DangerThresholds};
pub use crate::options::{EliminationRateProvider, EliminationRates, EngineOptions};
pub use crate::projection::Hours;
pub use crate::series::{BacSample, BacSeries};

pub mod prelude {
    pub use crate::activity::{ActivityState, ActivityUpdate, SessionSnapshot};
    pub use crate::data::{
        DrinkEvent, DrinkingFrequency, FoodEvent, Gender, Profile, Session, SessionBuilder,
    };
    pub use crate::engine::Engine;
    pub use crate::error::BacError;
    pub use crate::model::{DangerLevel, DangerThresholds};
    pub use crate::options::{EliminationRateProvider, EliminationRates, EngineOptions};
    pub use crate::projection::Hours;
    pub use crate::series::{BacSample, BacSeries};
}
