use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, BacError>;

/// Errors surfaced by the estimation engine and its import helpers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacError {
    /// A numeric input is outside its valid domain
    #[error("Invalid input: {param} = {value}")]
    InvalidInput { param: String, value: String },

    /// A timestamp could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Error encountered when reading CSV data
    #[error("CSV error: {0}")]
    Csv(String),

    /// Error encountered when reading or writing JSON
    #[error("JSON error: {0}")]
    Json(String),

    /// The threshold-crossing root finder failed
    #[error("Solver error: {0}")]
    Solver(String),
}

impl BacError {
    pub(crate) fn invalid(param: &str, value: impl ToString) -> Self {
        BacError::InvalidInput {
            param: param.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for BacError {
    fn from(e: serde_json::Error) -> Self {
        BacError::Json(e.to_string())
    }
}

impl From<csv::Error> for BacError {
    fn from(e: csv::Error) -> Self {
        BacError::Csv(e.to_string())
    }
}

impl From<chrono::ParseError> for BacError {
    fn from(e: chrono::ParseError) -> Self {
        BacError::InvalidTimestamp(e.to_string())
    }
}

/// Reject values that are not finite and strictly positive
pub(crate) fn ensure_positive(param: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(BacError::invalid(param, value))
    }
}
