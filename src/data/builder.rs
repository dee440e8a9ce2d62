use chrono::{DateTime, Duration, Utc};

use crate::data::*;
use crate::error::Result;

/// Fluent construction of a [Session]
///
/// Inputs are validated once, when [SessionBuilder::build] is called.
pub struct SessionBuilder {
    profile: Profile,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    pending: Vec<PendingEvent>,
}

#[derive(Clone)]
enum PendingEvent {
    Drink {
        volume_ml: f64,
        percentage: f64,
        at: DateTime<Utc>,
        name: Option<String>,
    },
    Food {
        factor: f64,
        at: DateTime<Utc>,
        name: Option<String>,
    },
}

impl PendingEvent {
    fn shifted(&self, delta: Duration) -> Self {
        let mut event = self.clone();
        match &mut event {
            PendingEvent::Drink { at, .. } | PendingEvent::Food { at, .. } => *at = *at + delta,
        }
        event
    }
}

impl SessionBuilder {
    pub fn new(profile: Profile, start_time: DateTime<Utc>) -> Self {
        SessionBuilder {
            profile,
            start_time,
            end_time: None,
            pending: Vec::new(),
        }
    }

    pub fn drink(mut self, volume_ml: f64, percentage: f64, at: DateTime<Utc>) -> Self {
        self.pending.push(PendingEvent::Drink {
            volume_ml,
            percentage,
            at,
            name: None,
        });
        self
    }

    pub fn named_drink(
        mut self,
        name: &str,
        volume_ml: f64,
        percentage: f64,
        at: DateTime<Utc>,
    ) -> Self {
        self.pending.push(PendingEvent::Drink {
            volume_ml,
            percentage,
            at,
            name: Some(name.to_string()),
        });
        self
    }

    pub fn food(mut self, factor: f64, at: DateTime<Utc>) -> Self {
        self.pending.push(PendingEvent::Food {
            factor,
            at,
            name: None,
        });
        self
    }

    pub fn named_food(mut self, name: &str, factor: f64, at: DateTime<Utc>) -> Self {
        self.pending.push(PendingEvent::Food {
            factor,
            at,
            name: Some(name.to_string()),
        });
        self
    }

    /// Repeat the last added event `n` times, `delta` apart
    ///
    /// Does nothing if no event has been added yet.
    pub fn repeat(mut self, n: usize, delta: Duration) -> Self {
        if let Some(last) = self.pending.last().cloned() {
            for i in 1..=n {
                self.pending.push(last.shifted(delta * i as i32));
            }
        }
        self
    }

    /// Mark the session as closed at `end_time`
    pub fn end(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Validate every event and assemble the [Session]
    pub fn build(self) -> Result<Session> {
        let mut session = Session::new(self.profile, self.start_time);
        for event in self.pending {
            match event {
                PendingEvent::Drink {
                    volume_ml,
                    percentage,
                    at,
                    name,
                } => {
                    let mut drink = DrinkEvent::new(volume_ml, percentage, at)?;
                    if let Some(name) = name {
                        drink = drink.with_name(name);
                    }
                    session.add_drink(drink);
                }
                PendingEvent::Food { factor, at, name } => {
                    let mut food = FoodEvent::new(factor, at)?;
                    if let Some(name) = name {
                        food = food.with_name(name);
                    }
                    session.add_food(food);
                }
            }
        }
        if let Some(end_time) = self.end_time {
            session.close(end_time)?;
        }
        Ok(session)
    }
}
