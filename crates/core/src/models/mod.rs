pub mod booking;
pub mod catalog;
pub mod patient;
pub mod time_slot;

use crate::errors::{ClinicError, ClinicResult};

/// Width of the `VARCHAR(255)` text columns.
pub const MAX_TEXT_LEN: usize = 255;

pub(crate) fn require_amount(field: &str, value: f64) -> ClinicResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ClinicError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

pub(crate) fn require_max_len(field: &str, value: &str, max: usize) -> ClinicResult<()> {
    if value.chars().count() > max {
        return Err(ClinicError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
