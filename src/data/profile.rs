use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, BacError, Result};

/// Biological sex used to pick the Widmark distribution ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Self-reported drinking habit, which selects the elimination rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrinkingFrequency {
    Rarely,
    Occasionally,
    Regularly,
    Frequently,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl fmt::Display for DrinkingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DrinkingFrequency::Rarely => "rarely",
            DrinkingFrequency::Occasionally => "occasionally",
            DrinkingFrequency::Regularly => "regularly",
            DrinkingFrequency::Frequently => "frequently",
        };
        write!(f, "{}", label)
    }
}

/// The person a BAC estimate is computed for
///
/// A [Profile] is immutable for the duration of a calculation. Its weight and
/// gender determine the volume alcohol distributes through, its drinking
/// frequency determines how fast alcohol is eliminated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileRecord")]
pub struct Profile {
    weight_kg: f64,
    gender: Gender,
    age: f64,
    drinking_frequency: DrinkingFrequency,
}

impl Profile {
    /// Create a new profile
    ///
    /// # Errors
    ///
    /// Returns [BacError::InvalidInput] if `weight_kg` is not strictly
    /// positive, or if `age` is negative or not finite.
    pub fn new(
        weight_kg: f64,
        gender: Gender,
        age: f64,
        drinking_frequency: DrinkingFrequency,
    ) -> Result<Self> {
        let weight_kg = ensure_positive("weight_kg", weight_kg)?;
        if !age.is_finite() || age < 0.0 {
            return Err(BacError::invalid("age", age));
        }
        Ok(Profile {
            weight_kg,
            gender,
            age,
            drinking_frequency,
        })
    }

    /// Body weight in kilograms
    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Age in years. Not used by the model, carried for consumers.
    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn drinking_frequency(&self) -> DrinkingFrequency {
        self.drinking_frequency
    }
}

#[derive(Deserialize)]
pub(crate) struct ProfileRecord {
    weight_kg: f64,
    gender: Gender,
    #[serde(default)]
    age: f64,
    drinking_frequency: DrinkingFrequency,
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = BacError;

    fn try_from(record: ProfileRecord) -> Result<Self> {
        Profile::new(
            record.weight_kg,
            record.gender,
            record.age,
            record.drinking_frequency,
        )
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} kg, {}, {} years, drinks {}",
            self.weight_kg, self.gender, self.age, self.drinking_frequency
        )
    }
}
