use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Deserialize;

use crate::data::*;
use crate::error::{BacError, Result};

/// Drinks and foods read from a CSV drink log, each sorted by time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    pub drinks: Vec<DrinkEvent>,
    pub foods: Vec<FoodEvent>,
}

impl EventLog {
    /// Attach the log to a new [Session] for `profile`
    ///
    /// The session starts at `start_time`, or at the earliest logged event when
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [BacError::InvalidInput] for an empty log without a `start_time`.
    pub fn into_session(
        self,
        profile: Profile,
        start_time: Option<DateTime<Utc>>,
    ) -> Result<Session> {
        let first_event = self
            .drinks
            .iter()
            .map(|d| d.consumed_at())
            .chain(self.foods.iter().map(|f| f.consumed_at()))
            .min();
        let start = start_time
            .or(first_event)
            .ok_or_else(|| BacError::invalid("start_time", "none given for an empty log"))?;
        let mut session = Session::new(profile, start);
        for drink in self.drinks {
            session.add_drink(drink);
        }
        for food in self.foods {
            session.add_food(food);
        }
        Ok(session)
    }
}

/// One row of the drink log
///
/// Missing values may be left empty or written as `.`.
#[derive(Deserialize, Debug)]
struct Row {
    kind: String,
    time: String,
    #[serde(default)]
    volume_ml: String,
    #[serde(default)]
    percentage: String,
    #[serde(default)]
    factor: String,
    #[serde(default)]
    name: String,
}

impl Row {
    fn into_event(self, line: usize) -> Result<Event> {
        let time = parse_time(&self.time)?;
        let name = optional(&self.name).map(str::to_string);
        match self.kind.trim().to_lowercase().as_str() {
            "drink" => {
                let volume = parse_required(&self.volume_ml, "VOLUME_ML", line)?;
                let percentage = parse_required(&self.percentage, "PERCENTAGE", line)?;
                let mut drink = DrinkEvent::new(volume, percentage, time)?;
                if let Some(name) = name {
                    drink = drink.with_name(name);
                }
                Ok(Event::Drink(drink))
            }
            "food" => {
                let factor = parse_required(&self.factor, "FACTOR", line)?;
                let mut food = FoodEvent::new(factor, time)?;
                if let Some(name) = name {
                    food = food.with_name(name);
                }
                Ok(Event::Food(food))
            }
            other => Err(BacError::Csv(format!(
                "Unknown event kind '{}' on line {}",
                other, line
            ))),
        }
    }
}

fn optional(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != ".").then_some(value)
}

fn parse_required(value: &str, column: &str, line: usize) -> Result<f64> {
    let value = optional(value)
        .ok_or_else(|| BacError::Csv(format!("{} is missing on line {}", column, line)))?;
    value
        .parse::<f64>()
        .map_err(|e| BacError::Csv(format!("{} '{}' on line {}: {}", column, value, line, e)))
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value.trim())?.with_timezone(&Utc))
}

/// Read a CSV drink log from `path`
///
/// # Format details
///
/// Columns are `KIND,TIME,VOLUME_ML,PERCENTAGE,FACTOR,NAME` (case-insensitive).
/// `KIND` is `drink` or `food`, `TIME` is an RFC 3339 timestamp. Drinks need
/// `VOLUME_ML` and `PERCENTAGE`, foods need `FACTOR`. Lines starting with `#`
/// are comments.
pub fn read_drink_log(path: impl AsRef<Path>) -> Result<EventLog> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| BacError::Csv(format!("{}: {}", path.as_ref().display(), e)))?;
    read_drink_log_from_reader(file)
}

/// Read a CSV drink log from any reader, see [read_drink_log]
pub fn read_drink_log_from_reader<R: Read>(reader: R) -> Result<EventLog> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv::StringRecord::from(
        reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect::<Vec<_>>(),
    );

    let mut log = EventLog::default();
    for record in reader.records() {
        let record = record?;
        // Comment lines are skipped by the reader but still counted here
        let line = record.position().map_or(0, |p| p.line() as usize);
        let row: Row = record.deserialize(Some(&headers))?;
        match row.into_event(line)? {
            Event::Drink(drink) => log.drinks.push(drink),
            Event::Food(food) => log.foods.push(food),
        }
    }
    log.drinks.sort_by_key(|d| d.consumed_at());
    log.foods.sort_by_key(|f| f.consumed_at());
    tracing::debug!(
        drinks = log.drinks.len(),
        foods = log.foods.len(),
        "read drink log"
    );
    Ok(log)
}

/// Write the events of a [Session] as a CSV drink log
pub fn write_drink_log<W: Write>(session: &Session, writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    writer.write_record(["KIND", "TIME", "VOLUME_ML", "PERCENTAGE", "FACTOR", "NAME"])?;

    for event in session.events() {
        let record = match event {
            Event::Drink(drink) => [
                "drink".to_string(),
                drink.consumed_at().to_rfc3339(),
                drink.volume_ml().to_string(),
                drink.alcohol_percentage().to_string(),
                ".".to_string(),
                drink.name().unwrap_or(".").to_string(),
            ],
            Event::Food(food) => [
                "food".to_string(),
                food.consumed_at().to_rfc3339(),
                ".".to_string(),
                ".".to_string(),
                food.absorption_factor().to_string(),
                food.name().unwrap_or(".").to_string(),
            ],
        };
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .map_err(|e| BacError::Csv(e.to_string()))?;
    Ok(())
}
