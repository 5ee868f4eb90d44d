//! HTTP route handlers.

pub mod activity_logs;
pub mod daily_summaries;
pub mod ema_logs;
pub mod food_log_entries;
pub mod food_logs;
pub mod foods;
pub mod friends;
pub mod health;
pub mod notifications;
pub mod places;
pub mod users;
pub mod visit_logs;

use domain::models::Position;
use serde::Deserialize;

use crate::error::ApiError;

/// `?start=&end=` for range listings, both epoch milliseconds.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: i64,
    pub end: i64,
}

impl RangeQuery {
    /// Both ends are inclusive; `start` may equal `end`.
    pub fn checked(&self) -> Result<(i64, i64), ApiError> {
        if self.start > self.end {
            return Err(ApiError::field("start", "start must not be after end"));
        }
        Ok((self.start, self.end))
    }
}

/// `?latitude=&longitude=&radiusKm=` kept as raw strings so a bad value
/// is reported against its own field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub radius_km: Option<String>,
}

impl LocationQuery {
    pub fn position(&self) -> Result<Position, ApiError> {
        let latitude = parse_number("latitude", self.latitude.as_deref())?
            .ok_or_else(|| ApiError::field("latitude", "latitude is required"))?;
        let longitude = parse_number("longitude", self.longitude.as_deref())?
            .ok_or_else(|| ApiError::field("longitude", "longitude is required"))?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ApiError::field(
                "latitude",
                "Latitude must be between -90 and 90",
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ApiError::field(
                "longitude",
                "Longitude must be between -180 and 180",
            ));
        }
        Ok(Position::new(latitude, longitude))
    }

    /// Radius in kilometres; `default` when absent. Must be positive.
    pub fn radius_km(&self, default: f64) -> Result<f64, ApiError> {
        let radius = parse_number("radiusKm", self.radius_km.as_deref())?.unwrap_or(default);
        if radius <= 0.0 {
            return Err(ApiError::field("radiusKm", "radiusKm must be positive"));
        }
        Ok(radius)
    }
}

/// Parses a finite decimal; `None` when the parameter is absent.
fn parse_number(field: &str, raw: Option<&str>) -> Result<Option<f64>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ApiError::field(field, format!("{} must be a number", field))),
    }
}
