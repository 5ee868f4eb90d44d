//! Great-circle distance and rectangular region helpers.

use serde::{Deserialize, Serialize};

/// Earth's radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points, in kilometers.
///
/// Inputs are degrees. No range validation is performed; callers validate
/// coordinates before reaching this point.
#[inline]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance rounded to the nearest whole meter.
#[inline]
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> i64 {
    (distance_km(lat1, lon1, lat2, lon2) * 1000.0).round() as i64
}

/// Axis-aligned latitude/longitude box with closed edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box extending `tolerance_deg` degrees from the center on every side.
    pub fn around(lat: f64, lon: f64, tolerance_deg: f64) -> Self {
        Self {
            min_lat: lat - tolerance_deg,
            max_lat: lat + tolerance_deg,
            min_lon: lon - tolerance_deg,
            max_lon: lon + tolerance_deg,
        }
    }

    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// A named service region described by its four edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub name: String,
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub center_lat: f64,
    pub center_lon: f64,
}

impl Region {
    /// Surabaya city limits.
    pub fn surabaya() -> Self {
        Self {
            name: "Surabaya".to_string(),
            north: -7.18,
            south: -7.35,
            east: 112.85,
            west: 112.65,
            center_lat: -7.2575,
            center_lon: 112.7521,
        }
    }

    /// Closed-interval containment: edges count as inside.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.bounds().contains(lat, lon)
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            min_lat: self.south,
            max_lat: self.north,
            min_lon: self.west,
            max_lon: self.east,
        }
    }
}
