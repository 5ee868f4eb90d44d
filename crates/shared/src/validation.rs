//! Field validators for `#[validate(custom(...))]` attributes.

use chrono::{TimeZone, Utc};
use validator::ValidationError;

/// Clock skew tolerated on client-supplied timestamps, in seconds.
const MAX_FUTURE_TOLERANCE_SECS: i64 = 300;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(error("latitude_range", "Latitude must be between -90 and 90"))
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(error(
            "longitude_range",
            "Longitude must be between -180 and 180",
        ))
    }
}

/// Validates an epoch-millisecond timestamp.
///
/// Must be positive, representable as a calendar instant, and no more than
/// five minutes ahead of the server clock.
pub fn validate_epoch_millis(timestamp_millis: i64) -> Result<(), ValidationError> {
    if timestamp_millis <= 0 {
        return Err(error("timestamp_positive", "Timestamp must be positive"));
    }

    let Some(timestamp) = Utc.timestamp_millis_opt(timestamp_millis).single() else {
        return Err(error("timestamp_invalid", "Invalid timestamp"));
    };

    let future_limit = Utc::now() + chrono::Duration::seconds(MAX_FUTURE_TOLERANCE_SECS);
    if timestamp > future_limit {
        return Err(error(
            "timestamp_future",
            "Timestamp cannot be in the future",
        ));
    }

    Ok(())
}

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value cannot be blank"))
    } else {
        Ok(())
    }
}
