//! Place proximity index.
//!
//! A linear scan over the place table. The place set is small and static
//! enough that no spatial index is kept.

use std::sync::Arc;

use shared::geo;

use crate::error::DomainError;
use crate::models::{NearbyPlace, Place};
use crate::stores::PlaceStore;

pub struct PlaceProximityIndex {
    places: Arc<dyn PlaceStore>,
}

impl PlaceProximityIndex {
    pub fn new(places: Arc<dyn PlaceStore>) -> Self {
        Self { places }
    }

    /// Places within `radius_km` of the point, in store iteration order.
    pub async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<Place>, DomainError> {
        check_radius(radius_km)?;
        let places = self.places.find_all().await?;
        Ok(within_radius(places, latitude, longitude, radius_km))
    }

    /// Places within `radius_km`, closest first, annotated with distance.
    pub async fn nearby_by_distance(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<NearbyPlace>, DomainError> {
        let mut nearby: Vec<NearbyPlace> = self
            .nearby(latitude, longitude, radius_km)
            .await?
            .into_iter()
            .map(|place| NearbyPlace {
                distance_meters: geo::distance_meters(
                    latitude,
                    longitude,
                    place.latitude,
                    place.longitude,
                ),
                place,
            })
            .collect();
        nearby.sort_by_key(|n| n.distance_meters);
        Ok(nearby)
    }
}

fn check_radius(radius_km: f64) -> Result<(), DomainError> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(())
    } else {
        Err(DomainError::validation(
            "radiusKm",
            "Radius must be a positive number",
        ))
    }
}

/// Keeps the places whose Haversine distance is at most `radius_km`.
pub fn within_radius(places: Vec<Place>, latitude: f64, longitude: f64, radius_km: f64) -> Vec<Place> {
    places
        .into_iter()
        .filter(|p| geo::distance_km(latitude, longitude, p.latitude, p.longitude) <= radius_km)
        .collect()
}
