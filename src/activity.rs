//! Plain-data views of a session for UI consumers
//!
//! A [SessionSnapshot] is everything a gauge, widget or notification needs at
//! one instant. It is computed on demand by [Engine::snapshot](crate::Engine::snapshot);
//! how often to take one is up to the caller.
//!
//! [ActivityState] tracks a platform live activity as an explicit value.
//! Transitions are pure: they take the current state and return the next one
//! together with the update to push to the platform, if any.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::DangerLevel;
use crate::projection::Hours;

/// The state of a session at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: DateTime<Utc>,
    /// BAC in g/L
    pub bac: f64,
    /// BAC capped at the display ceiling
    pub display_bac: f64,
    pub danger_level: DangerLevel,
    pub time_to_legal: Hours,
    pub time_to_zero: Hours,
    /// Drinks consumed at or before `time`
    pub drink_count: usize,
    /// Grams of ethanol consumed at or before `time`
    pub total_grams: f64,
}

impl SessionSnapshot {
    /// BAC formatted for display, e.g. `"0.62 g/L"`
    pub fn bac_text(&self) -> String {
        format!("{:.2} g/L", self.display_bac)
    }

    pub fn is_sober(&self) -> bool {
        self.bac <= 0.0
    }
}

impl fmt::Display for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}), legal in {}, sober in {}",
            self.bac_text(),
            self.danger_level,
            self.time_to_legal,
            self.time_to_zero
        )
    }
}

/// A live activity, either not shown or shown under a platform id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ActivityState {
    #[default]
    Inactive,
    Active { id: String },
}

/// What to send to the platform after a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ActivityUpdate {
    Start { id: String, content: SessionSnapshot },
    Update { id: String, content: SessionSnapshot },
    End { id: String, content: SessionSnapshot },
}

impl ActivityState {
    pub fn is_active(&self) -> bool {
        matches!(self, ActivityState::Active { .. })
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            ActivityState::Inactive => None,
            ActivityState::Active { id } => Some(id),
        }
    }

    /// Show the activity under `id`
    ///
    /// An already active activity keeps its id and is updated instead.
    pub fn start(
        &self,
        id: impl Into<String>,
        snapshot: &SessionSnapshot,
    ) -> (ActivityState, Option<ActivityUpdate>) {
        match self {
            ActivityState::Inactive => {
                let id = id.into();
                (
                    ActivityState::Active { id: id.clone() },
                    Some(ActivityUpdate::Start {
                        id,
                        content: snapshot.clone(),
                    }),
                )
            }
            ActivityState::Active { .. } => self.update(snapshot),
        }
    }

    /// Refresh the activity with a new snapshot
    ///
    /// Once the snapshot is sober the activity ends by itself.
    pub fn update(&self, snapshot: &SessionSnapshot) -> (ActivityState, Option<ActivityUpdate>) {
        match self {
            ActivityState::Inactive => (ActivityState::Inactive, None),
            ActivityState::Active { .. } if snapshot.is_sober() => self.end(snapshot),
            ActivityState::Active { id } => (
                self.clone(),
                Some(ActivityUpdate::Update {
                    id: id.clone(),
                    content: snapshot.clone(),
                }),
            ),
        }
    }

    /// Dismiss the activity
    pub fn end(&self, snapshot: &SessionSnapshot) -> (ActivityState, Option<ActivityUpdate>) {
        match self {
            ActivityState::Inactive => (ActivityState::Inactive, None),
            ActivityState::Active { id } => (
                ActivityState::Inactive,
                Some(ActivityUpdate::End {
                    id: id.clone(),
                    content: snapshot.clone(),
                }),
            ),
        }
    }
}
