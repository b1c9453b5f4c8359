//! Direction text + magnitude → canonical signed amount.

use crate::error::ReconError;
use crate::model::Direction;

/// Derive the signed minor-unit amount for a raw direction value.
///
/// Unknown directions are an error; the caller must reject the whole record
/// rather than fall back to zero.
pub fn signed_amount(direction: &str, magnitude_minor: i64) -> Result<i64, ReconError> {
    let direction: Direction = direction.parse()?;
    Ok(direction.signed(magnitude_minor))
}
