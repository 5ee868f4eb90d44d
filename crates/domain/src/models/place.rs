//! Place of interest domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::trigger::NotificationType;

/// Represents a place of interest that users can be prompted at.
///
/// Places are shared reference data, not owned by any user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub category: PlaceCategory,
    pub latitude: f64,
    pub longitude: f64,
    /// Geofence radius in meters.
    pub geofence_radius: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fixed set of place categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Restaurant,
    Park,
    Gym,
    Store,
    Other,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 5] = [
        PlaceCategory::Restaurant,
        PlaceCategory::Park,
        PlaceCategory::Gym,
        PlaceCategory::Store,
        PlaceCategory::Other,
    ];

    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCategory::Restaurant => "restaurant",
            PlaceCategory::Park => "park",
            PlaceCategory::Gym => "gym",
            PlaceCategory::Store => "store",
            PlaceCategory::Other => "other",
        }
    }

    /// Which log the user is prompted to create at this kind of place.
    pub fn notification_type(&self) -> NotificationType {
        match self {
            PlaceCategory::Restaurant => NotificationType::FoodLog,
            PlaceCategory::Gym => NotificationType::ActivityLog,
            PlaceCategory::Park => NotificationType::EmaLog,
            PlaceCategory::Store | PlaceCategory::Other => NotificationType::VisitLog,
        }
    }

    /// Material icon name shown with the prompt.
    pub fn icon(&self) -> &'static str {
        match self {
            PlaceCategory::Restaurant => "restaurant",
            PlaceCategory::Gym => "fitness_center",
            PlaceCategory::Park => "park",
            PlaceCategory::Store => "shopping_cart",
            PlaceCategory::Other => "place",
        }
    }

    pub fn prompt_message(&self, place_name: &str) -> String {
        match self {
            PlaceCategory::Restaurant => format!("You're at {}. Log your meal?", place_name),
            PlaceCategory::Gym => format!("You're at {}. Track your workout?", place_name),
            PlaceCategory::Park => format!("You're at {}. How are you feeling?", place_name),
            PlaceCategory::Store | PlaceCategory::Other => {
                format!("You're at {}. Log your visit?", place_name)
            }
        }
    }

    /// Categories whose prompts stay MEDIUM priority out to 200 m.
    pub fn is_high_interest(&self) -> bool {
        matches!(
            self,
            PlaceCategory::Restaurant | PlaceCategory::Gym | PlaceCategory::Park
        )
    }
}

impl FromStr for PlaceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "restaurant" => Ok(PlaceCategory::Restaurant),
            "park" => Ok(PlaceCategory::Park),
            "gym" => Ok(PlaceCategory::Gym),
            "store" => Ok(PlaceCategory::Store),
            "other" => Ok(PlaceCategory::Other),
            _ => Err(format!("Invalid place category: {}", s)),
        }
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A place annotated with its distance from a query point.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPlace {
    #[serde(flatten)]
    pub place: Place,
    pub distance_meters: i64,
}

/// Request payload for creating a place.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaceRequest {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    pub category: PlaceCategory,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: f64,

    #[validate(range(min = 1, message = "Geofence radius must be a positive number of meters"))]
    pub geofence_radius: i32,
}

/// Request payload for updating a place (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaceRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    pub category: Option<PlaceCategory>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,

    #[validate(range(min = 1, message = "Geofence radius must be a positive number of meters"))]
    pub geofence_radius: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serialization() {
        assert_eq!(
            serde_json::to_string(&PlaceCategory::Restaurant).unwrap(),
            "\"restaurant\""
        );
        let gym: PlaceCategory = serde_json::from_str("\"gym\"").unwrap();
        assert_eq!(gym, PlaceCategory::Gym);
    }

    #[test]
    fn test_category_from_str_is_case_insensitive() {
        assert_eq!("PARK".parse::<PlaceCategory>(), Ok(PlaceCategory::Park));
        assert_eq!("Store".parse::<PlaceCategory>(), Ok(PlaceCategory::Store));
        assert!("museum".parse::<PlaceCategory>().is_err());
    }

    #[test]
    fn test_category_round_trips_through_as_str() {
        for category in PlaceCategory::ALL {
            assert_eq!(category.as_str().parse::<PlaceCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_category_notification_types() {
        assert_eq!(
            PlaceCategory::Restaurant.notification_type(),
            NotificationType::FoodLog
        );
        assert_eq!(
            PlaceCategory::Gym.notification_type(),
            NotificationType::ActivityLog
        );
        assert_eq!(
            PlaceCategory::Park.notification_type(),
            NotificationType::EmaLog
        );
        assert_eq!(
            PlaceCategory::Store.notification_type(),
            NotificationType::VisitLog
        );
        assert_eq!(
            PlaceCategory::Other.notification_type(),
            NotificationType::VisitLog
        );
    }

    #[test]
    fn test_category_icons() {
        assert_eq!(PlaceCategory::Gym.icon(), "fitness_center");
        assert_eq!(PlaceCategory::Store.icon(), "shopping_cart");
        assert_eq!(PlaceCategory::Other.icon(), "place");
    }

    #[test]
    fn test_prompt_message() {
        assert_eq!(
            PlaceCategory::Park.prompt_message("Taman Bungkul"),
            "You're at Taman Bungkul. How are you feeling?"
        );
        assert_eq!(
            PlaceCategory::Other.prompt_message("Balai Kota"),
            "You're at Balai Kota. Log your visit?"
        );
    }

    #[test]
    fn test_high_interest_categories() {
        assert!(PlaceCategory::Restaurant.is_high_interest());
        assert!(PlaceCategory::Gym.is_high_interest());
        assert!(PlaceCategory::Park.is_high_interest());
        assert!(!PlaceCategory::Store.is_high_interest());
        assert!(!PlaceCategory::Other.is_high_interest());
    }

    #[test]
    fn test_create_place_request_validation() {
        let json = r#"{
            "name": "Taman Bungkul",
            "category": "park",
            "latitude": -7.2913,
            "longitude": 112.7398,
            "geofenceRadius": 150
        }"#;
        let request: CreatePlaceRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());

        let bad = CreatePlaceRequest {
            latitude: 95.0,
            geofence_radius: 0,
            ..request
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("latitude"));
        assert!(fields.contains_key("geofence_radius"));
    }

    #[test]
    fn test_create_place_request_rejects_unknown_category() {
        let json = r#"{
            "name": "Museum",
            "category": "museum",
            "latitude": -7.25,
            "longitude": 112.75,
            "geofenceRadius": 100
        }"#;
        assert!(serde_json::from_str::<CreatePlaceRequest>(json).is_err());
    }

    #[test]
    fn test_nearby_place_flattens() {
        let place = Place {
            id: 7,
            name: "Gym".to_string(),
            category: PlaceCategory::Gym,
            latitude: -7.26,
            longitude: 112.74,
            geofence_radius: 80,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(NearbyPlace {
            place,
            distance_meters: 42,
        })
        .unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["geofenceRadius"], 80);
        assert_eq!(json["distanceMeters"], 42);
    }
}
