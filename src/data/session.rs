use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::builder::SessionBuilder;
use crate::data::event::{DrinkEvent, DrinkRecord, Event, FoodEvent, FoodRecord};
use crate::data::profile::{Profile, ProfileRecord};
use crate::error::{BacError, Result};

/// A drinking session: a profile plus the drinks and foods logged during it
///
/// Events are kept sorted by consumption time. A [Session] owns its events;
/// the engine only ever borrows it, so an evaluation always sees one stable
/// snapshot of the event lists.
#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "SessionRecord")]
pub struct Session {
    profile: Profile,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    drinks: Vec<DrinkEvent>,
    foods: Vec<FoodEvent>,
}

impl Session {
    /// Start an empty session
    pub fn new(profile: Profile, start_time: DateTime<Utc>) -> Self {
        Session {
            profile,
            start_time,
            end_time: None,
            drinks: Vec::new(),
            foods: Vec::new(),
        }
    }

    /// Create a [SessionBuilder] for fluent construction
    pub fn builder(profile: Profile, start_time: DateTime<Utc>) -> SessionBuilder {
        SessionBuilder::new(profile, start_time)
    }

    /// Parse a session from its JSON representation
    ///
    /// # Errors
    ///
    /// Returns [BacError::Json] for malformed JSON and [BacError::InvalidInput]
    /// for well-formed values outside their valid domain.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: SessionRecord = serde_json::from_str(json)?;
        Session::try_from(record)
    }

    /// Serialize the session to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// When the session was closed, if it has been
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    /// Drinks in chronological order
    pub fn drinks(&self) -> &[DrinkEvent] {
        &self.drinks
    }

    /// Foods in chronological order
    pub fn foods(&self) -> &[FoodEvent] {
        &self.foods
    }

    /// All events merged in chronological order; drinks precede foods at equal times
    pub fn events(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .drinks
            .iter()
            .cloned()
            .map(Event::Drink)
            .chain(self.foods.iter().cloned().map(Event::Food))
            .collect();
        events.sort_by_key(|event| event.time());
        events
    }

    /// Time of the most recent drink, if any
    pub fn last_drink_time(&self) -> Option<DateTime<Utc>> {
        self.drinks.last().map(|d| d.consumed_at())
    }

    /// Log a drink, keeping the list sorted
    pub fn add_drink(&mut self, drink: DrinkEvent) {
        let idx = self
            .drinks
            .partition_point(|d| d.consumed_at() <= drink.consumed_at());
        self.drinks.insert(idx, drink);
    }

    /// Log a food, keeping the list sorted
    pub fn add_food(&mut self, food: FoodEvent) {
        let idx = self
            .foods
            .partition_point(|f| f.consumed_at() <= food.consumed_at());
        self.foods.insert(idx, food);
    }

    pub fn add_event(&mut self, event: Event) {
        match event {
            Event::Drink(drink) => self.add_drink(drink),
            Event::Food(food) => self.add_food(food),
        }
    }

    /// Remove the drink at `index`, returning it
    pub fn remove_drink(&mut self, index: usize) -> Option<DrinkEvent> {
        (index < self.drinks.len()).then(|| self.drinks.remove(index))
    }

    /// Remove the food at `index`, returning it
    pub fn remove_food(&mut self, index: usize) -> Option<FoodEvent> {
        (index < self.foods.len()).then(|| self.foods.remove(index))
    }

    /// Close the session at `end_time`
    ///
    /// # Errors
    ///
    /// Returns [BacError::InvalidInput] if `end_time` precedes the start.
    pub fn close(&mut self, end_time: DateTime<Utc>) -> Result<()> {
        if end_time < self.start_time {
            return Err(BacError::invalid("end_time", end_time.to_rfc3339()));
        }
        self.end_time = Some(end_time);
        Ok(())
    }
}

#[derive(Deserialize)]
struct SessionRecord {
    profile: ProfileRecord,
    start_time: DateTime<Utc>,
    #[serde(default)]
    end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    drinks: Vec<DrinkRecord>,
    #[serde(default)]
    foods: Vec<FoodRecord>,
}

impl TryFrom<SessionRecord> for Session {
    type Error = BacError;

    fn try_from(record: SessionRecord) -> Result<Self> {
        let mut session = Session::new(Profile::try_from(record.profile)?, record.start_time);
        for drink in record.drinks {
            session.add_drink(DrinkEvent::try_from(drink)?);
        }
        for food in record.foods {
            session.add_food(FoodEvent::try_from(food)?);
        }
        if let Some(end_time) = record.end_time {
            session.close(end_time)?;
        }
        Ok(session)
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session started {}", self.start_time.to_rfc3339())?;
        writeln!(f, "  Profile: {}", self.profile)?;
        for event in self.events() {
            writeln!(f, "  {}", event)?;
        }
        if let Some(end_time) = self.end_time {
            writeln!(f, "Session ended {}", end_time.to_rfc3339())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DrinkingFrequency, Gender};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap()
    }

    fn profile() -> Profile {
        Profile::new(70.0, Gender::Female, 25.0, DrinkingFrequency::Occasionally).unwrap()
    }

    #[test]
    fn test_events_stay_sorted() {
        let mut session = Session::new(profile(), t0());
        session.add_drink(DrinkEvent::new(330.0, 5.0, t0() + Duration::hours(2)).unwrap());
        session.add_drink(DrinkEvent::new(150.0, 12.0, t0()).unwrap());
        session.add_food(FoodEvent::new(0.5, t0() + Duration::minutes(30)).unwrap());

        let times: Vec<_> = session.drinks().iter().map(|d| d.consumed_at()).collect();
        assert_eq!(times, vec![t0(), t0() + Duration::hours(2)]);
        assert_eq!(session.last_drink_time(), Some(t0() + Duration::hours(2)));

        let events = session.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], Event::Food(_)));
    }

    #[test]
    fn test_close_session() {
        let mut session = Session::new(profile(), t0());
        assert!(session.is_active());
        assert!(session.close(t0() - Duration::minutes(1)).is_err());
        session.close(t0() + Duration::hours(4)).unwrap();
        assert!(!session.is_active());
    }

    #[test]
    fn test_remove_drink() {
        let mut session = Session::new(profile(), t0());
        session.add_drink(DrinkEvent::new(330.0, 5.0, t0()).unwrap());
        assert!(session.remove_drink(3).is_none());
        assert!(session.remove_drink(0).is_some());
        assert!(session.drinks().is_empty());
    }

    #[test]
    fn test_json_round_trip_sorts_events() {
        let json = r#"{
            "profile": {"weight_kg": 80.0, "gender": "male", "age": 30, "drinking_frequency": "rarely"},
            "start_time": "2024-06-01T20:00:00Z",
            "drinks": [
                {"volume_ml": 500.0, "alcohol_percentage": 5.0, "consumed_at": "2024-06-01T21:00:00Z"},
                {"volume_ml": 500.0, "alcohol_percentage": 5.0, "consumed_at": "2024-06-01T20:00:00Z"}
            ]
        }"#;
        let session = Session::from_json(json).unwrap();
        assert_eq!(session.drinks()[0].consumed_at(), t0());
        assert!(session.foods().is_empty());

        let again = Session::from_json(&session.to_json().unwrap()).unwrap();
        assert_eq!(session, again);
    }
}
