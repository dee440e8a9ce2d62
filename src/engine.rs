use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::activity::SessionSnapshot;
use crate::data::{DrinkEvent, FoodEvent, Profile, Session};
use crate::error::Result;
use crate::model::{self, Body, DangerLevel};
use crate::options::{EliminationRateProvider, EngineOptions};
use crate::projection::{self, Hours};
use crate::series::{self, BacSeries};

/// Entry point for BAC estimation
///
/// An [Engine] holds its [EngineOptions] and the [EliminationRateProvider]
/// resolving β for each profile, by default the options' rate table. Every
/// method is a pure function of its arguments, so one engine can be shared
/// freely between threads and called at any cadence.
#[derive(Clone)]
pub struct Engine {
    options: EngineOptions,
    rates: Arc<dyn EliminationRateProvider + Send + Sync>,
}

impl Default for Engine {
    fn default() -> Self {
        let options = EngineOptions::default();
        Engine {
            rates: Arc::new(options.elimination),
            options,
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine, validating `options`
    pub fn new(options: EngineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Engine {
            rates: Arc::new(options.elimination),
            options,
        })
    }

    /// Resolve elimination rates with `provider` instead of the options' table
    pub fn with_rate_provider<P>(mut self, provider: P) -> Self
    where
        P: EliminationRateProvider + Send + Sync + 'static,
    {
        self.rates = Arc::new(provider);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Resolve the profile-dependent constants with the engine's rate provider
    pub fn body(&self, profile: &Profile) -> Result<Body> {
        Body::resolve_with(profile, &self.options, self.rates.as_ref())
    }

    /// BAC in g/L at `time`
    pub fn compute_bac(
        &self,
        profile: &Profile,
        drinks: &[DrinkEvent],
        foods: &[FoodEvent],
        time: DateTime<Utc>,
    ) -> Result<f64> {
        let body = self.body(profile)?;
        let pending = drinks.iter().filter(|d| d.consumed_at() > time).count();
        if pending > 0 {
            tracing::debug!(pending, time = %time, "ignoring drinks logged after query time");
        }
        Ok(model::total_bac(drinks, &body, foods, time, &self.options))
    }

    /// Hours for `bac` to fall to the legal limit at the profile's elimination rate
    pub fn compute_time_to_legal(&self, bac: f64, profile: &Profile) -> Result<Hours> {
        let body = self.body(profile)?;
        projection::time_to_legal_limit(bac, self.options.legal_limit, body.elimination_rate)
    }

    /// Hours for `bac` to reach zero at the profile's elimination rate
    pub fn compute_time_to_zero(&self, bac: f64, profile: &Profile) -> Result<Hours> {
        let body = self.body(profile)?;
        projection::time_to_zero(bac, body.elimination_rate)
    }

    /// Hours from `now` until the session's curve falls to the legal limit
    pub fn projected_time_to_legal(&self, session: &Session, now: DateTime<Utc>) -> Result<Hours> {
        self.projected_crossing(session, now, self.options.legal_limit)
    }

    /// Hours from `now` until the session's curve reaches zero
    pub fn projected_time_to_zero(&self, session: &Session, now: DateTime<Utc>) -> Result<Hours> {
        self.projected_crossing(session, now, 0.0)
    }

    fn projected_crossing(
        &self,
        session: &Session,
        now: DateTime<Utc>,
        threshold: f64,
    ) -> Result<Hours> {
        let body = self.body(session.profile())?;
        projection::projected_crossing(
            session.drinks(),
            &body,
            session.foods(),
            now,
            threshold,
            &self.options,
        )
    }

    /// Sample the BAC curve from `start` to `end` every `interval_minutes`
    pub fn sample_series(
        &self,
        profile: &Profile,
        drinks: &[DrinkEvent],
        foods: &[FoodEvent],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval_minutes: u32,
    ) -> Result<BacSeries> {
        let body = self.body(profile)?;
        series::sample_series(
            drinks,
            &body,
            foods,
            start,
            end,
            interval_minutes,
            &self.options,
        )
    }

    /// Parallel variant of [Engine::sample_series]
    pub fn sample_series_par(
        &self,
        profile: &Profile,
        drinks: &[DrinkEvent],
        foods: &[FoodEvent],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval_minutes: u32,
    ) -> Result<BacSeries> {
        let body = self.body(profile)?;
        series::sample_series_par(
            drinks,
            &body,
            foods,
            start,
            end,
            interval_minutes,
            &self.options,
        )
    }

    /// Sample a whole session, from its start to its end
    ///
    /// An open session is sampled until `now`, or for the default window when
    /// `now` is not after the start.
    pub fn sample_session(
        &self,
        session: &Session,
        now: DateTime<Utc>,
        interval_minutes: u32,
    ) -> Result<BacSeries> {
        let end = session.end_time().unwrap_or(now);
        self.sample_series(
            session.profile(),
            session.drinks(),
            session.foods(),
            session.start_time(),
            end,
            interval_minutes,
        )
    }

    pub fn classify_danger(&self, bac: f64) -> DangerLevel {
        model::classify_danger(bac, &self.options.thresholds)
    }

    /// `bac` capped at the display ceiling
    pub fn display_bac(&self, bac: f64) -> f64 {
        model::display_bac(bac, self.options.display_ceiling)
    }

    /// Everything a UI needs about `session` at `now`
    ///
    /// Projections follow the full curve, so drinks still being absorbed are
    /// accounted for.
    pub fn snapshot(&self, session: &Session, now: DateTime<Utc>) -> Result<SessionSnapshot> {
        let body = self.body(session.profile())?;
        let bac = model::total_bac(
            session.drinks(),
            &body,
            session.foods(),
            now,
            &self.options,
        );
        let consumed: Vec<&DrinkEvent> = session
            .drinks()
            .iter()
            .filter(|d| d.consumed_at() <= now)
            .collect();

        Ok(SessionSnapshot {
            time: now,
            bac,
            display_bac: self.display_bac(bac),
            danger_level: self.classify_danger(bac),
            time_to_legal: self.projected_time_to_legal(session, now)?,
            time_to_zero: self.projected_time_to_zero(session, now)?,
            drink_count: consumed.len(),
            total_grams: consumed.iter().map(|d| d.alcohol_grams()).sum(),
        })
    }
}
