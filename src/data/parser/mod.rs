//! Import and export of session data
//!
//! Two formats are supported: the full JSON representation of a [Session],
//! and a flat CSV drink log with one row per drink or food.

pub mod log;

pub use log::{read_drink_log, read_drink_log_from_reader, write_drink_log, EventLog};

use std::path::Path;

use crate::data::Session;
use crate::error::{BacError, Result};

/// Read a [Session] from a JSON file
pub fn read_session_json(path: impl AsRef<Path>) -> Result<Session> {
    let contents = std::fs::read_to_string(path.as_ref())
        .map_err(|e| BacError::Json(format!("{}: {}", path.as_ref().display(), e)))?;
    Session::from_json(&contents)
}

/// Write a [Session] to a JSON file
pub fn write_session_json(session: &Session, path: impl AsRef<Path>) -> Result<()> {
    let json = session.to_json()?;
    std::fs::write(path.as_ref(), json)
        .map_err(|e| BacError::Json(format!("{}: {}", path.as_ref().display(), e)))
}
