use crate::data::ETHANOL_DENSITY;
use crate::error::{ensure_positive, BacError, Result};

/// Grams of pure ethanol in a drink
///
/// `grams = volume_ml * (alcohol_percentage / 100) * 0.789`
///
/// # Errors
///
/// Out-of-range inputs are rejected, never clamped: `volume_ml` must be
/// positive and `alcohol_percentage` must be in (0, 100].
pub fn alcohol_grams(volume_ml: f64, alcohol_percentage: f64) -> Result<f64> {
    let volume_ml = ensure_positive("volume_ml", volume_ml)?;
    let alcohol_percentage = ensure_positive("alcohol_percentage", alcohol_percentage)?;
    if alcohol_percentage > 100.0 {
        return Err(BacError::invalid("alcohol_percentage", alcohol_percentage));
    }
    Ok(volume_ml * (alcohol_percentage / 100.0) * ETHANOL_DENSITY)
}
