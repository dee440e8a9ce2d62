use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, BacError, Result};

/// Density of ethanol in g/mL
pub const ETHANOL_DENSITY: f64 = 0.789;

/// Represents a logged event in a drinking session
///
/// Events are immutable once logged. An amended drink is a deletion followed
/// by a new [DrinkEvent].
#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Event {
    /// An alcoholic drink
    Drink(DrinkEvent),
    /// A meal or snack that slows absorption
    Food(FoodEvent),
}

impl Event {
    /// Get the time of the event
    pub fn time(&self) -> DateTime<Utc> {
        match self {
            Event::Drink(drink) => drink.consumed_at(),
            Event::Food(food) => food.consumed_at(),
        }
    }
}

/// A single alcoholic drink
#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "DrinkRecord")]
pub struct DrinkEvent {
    volume_ml: f64,
    alcohol_percentage: f64,
    consumed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl DrinkEvent {
    /// Create a new drink event
    ///
    /// # Arguments
    ///
    /// * `volume_ml` - Volume of the drink in millilitres, must be positive
    /// * `alcohol_percentage` - Alcohol by volume, in (0, 100]
    /// * `consumed_at` - When the drink was consumed
    pub fn new(volume_ml: f64, alcohol_percentage: f64, consumed_at: DateTime<Utc>) -> Result<Self> {
        crate::model::units::alcohol_grams(volume_ml, alcohol_percentage)?;
        Ok(DrinkEvent {
            volume_ml,
            alcohol_percentage,
            consumed_at,
            name: None,
        })
    }

    /// Attach a display label, e.g. "IPA"
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn volume_ml(&self) -> f64 {
        self.volume_ml
    }

    pub fn alcohol_percentage(&self) -> f64 {
        self.alcohol_percentage
    }

    pub fn consumed_at(&self) -> DateTime<Utc> {
        self.consumed_at
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Mass of pure ethanol in grams
    pub fn alcohol_grams(&self) -> f64 {
        self.volume_ml * (self.alcohol_percentage / 100.0) * ETHANOL_DENSITY
    }
}

/// Food consumed during a session
///
/// The `absorption_factor` is the strongest multiplier the food applies to the
/// peak BAC of a drink; lower values slow absorption more.
#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "FoodRecord")]
pub struct FoodEvent {
    absorption_factor: f64,
    consumed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl FoodEvent {
    /// Create a new food event
    ///
    /// # Errors
    ///
    /// Returns [BacError::InvalidInput] unless `absorption_factor` is in (0, 1].
    pub fn new(absorption_factor: f64, consumed_at: DateTime<Utc>) -> Result<Self> {
        let absorption_factor = ensure_positive("absorption_factor", absorption_factor)?;
        if absorption_factor > 1.0 {
            return Err(BacError::invalid("absorption_factor", absorption_factor));
        }
        Ok(FoodEvent {
            absorption_factor,
            consumed_at,
            name: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn absorption_factor(&self) -> f64 {
        self.absorption_factor
    }

    pub fn consumed_at(&self) -> DateTime<Utc> {
        self.consumed_at
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Deserialize)]
pub(crate) struct DrinkRecord {
    volume_ml: f64,
    alcohol_percentage: f64,
    consumed_at: DateTime<Utc>,
    #[serde(default)]
    name: Option<String>,
}

impl TryFrom<DrinkRecord> for DrinkEvent {
    type Error = BacError;

    fn try_from(record: DrinkRecord) -> Result<Self> {
        let drink = DrinkEvent::new(
            record.volume_ml,
            record.alcohol_percentage,
            record.consumed_at,
        )?;
        Ok(DrinkEvent {
            name: record.name,
            ..drink
        })
    }
}

#[derive(Deserialize)]
pub(crate) struct FoodRecord {
    absorption_factor: f64,
    consumed_at: DateTime<Utc>,
    #[serde(default)]
    name: Option<String>,
}

impl TryFrom<FoodRecord> for FoodEvent {
    type Error = BacError;

    fn try_from(record: FoodRecord) -> Result<Self> {
        let food = FoodEvent::new(record.absorption_factor, record.consumed_at)?;
        Ok(FoodEvent {
            name: record.name,
            ..food
        })
    }
}

impl fmt::Display for DrinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Drink {}: {} mL at {}% ({:.1} g)",
            self.consumed_at.to_rfc3339(),
            self.volume_ml,
            self.alcohol_percentage,
            self.alcohol_grams()
        )?;
        if let Some(name) = &self.name {
            write!(f, " [{}]", name)?;
        }
        Ok(())
    }
}

impl fmt::Display for FoodEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Food {}: factor {}",
            self.consumed_at.to_rfc3339(),
            self.absorption_factor
        )?;
        if let Some(name) = &self.name {
            write!(f, " [{}]", name)?;
        }
        Ok(())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Drink(drink) => write!(f, "{}", drink),
            Event::Food(food) => write!(f, "{}", food),
        }
    }
}
