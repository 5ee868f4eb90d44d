//! Place entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Place, PlaceCategory};
use sqlx::FromRow;

/// Database row mapping for the places table.
#[derive(Debug, Clone, FromRow)]
pub struct PlaceEntity {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub geofence_radius: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlaceEntity> for Place {
    fn from(entity: PlaceEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            // The column is CHECK-constrained to the known categories
            category: entity.category.parse().unwrap_or(PlaceCategory::Other),
            latitude: entity.latitude,
            longitude: entity.longitude,
            geofence_radius: entity.geofence_radius,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(category: &str) -> PlaceEntity {
        PlaceEntity {
            id: 4,
            name: "Kebun Bibit".to_string(),
            category: category.to_string(),
            latitude: -7.2990,
            longitude: 112.7570,
            geofence_radius: 150,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_place_entity_to_domain() {
        let place: Place = entity("park").into();
        assert_eq!(place.id, 4);
        assert_eq!(place.category, PlaceCategory::Park);
        assert_eq!(place.geofence_radius, 150);
    }

    #[test]
    fn test_unknown_category_falls_back_to_other() {
        let place: Place = entity("museum").into();
        assert_eq!(place.category, PlaceCategory::Other);
    }
}
