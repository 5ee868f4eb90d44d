//! Food log domain models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::log_event::{position_of, LogEvent};
use super::trigger::Position;

/// A meal logged by a user, made of one or more food lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodLog {
    pub id: i64,
    pub user_id: i64,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub items: Vec<FoodLogItem>,
}

/// One food line within a food log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogItem {
    pub id: i64,
    pub food_id: i64,
    pub food_name: String,
    /// Calories per unit of the referenced food.
    pub food_calories: f64,
    pub quantity: Option<i32>,
    /// Explicit calorie override for the whole line.
    pub calories: Option<f64>,
}

impl FoodLogItem {
    /// Line calories: the override when present, else per-unit calories
    /// times quantity (default 1).
    pub fn calories(&self) -> f64 {
        match self.calories {
            Some(calories) => calories,
            None => self.food_calories * f64::from(self.quantity.unwrap_or(1)),
        }
    }
}

impl FoodLog {
    pub fn total_calories(&self) -> f64 {
        self.items.iter().map(FoodLogItem::calories).sum()
    }
}

impl LogEvent for FoodLog {
    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn occurred_at_ms(&self) -> i64 {
        self.timestamp
    }

    fn position(&self) -> Option<Position> {
        position_of(self.latitude, self.longitude)
    }
}

/// Food log with its computed calorie total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogResponse {
    #[serde(flatten)]
    pub log: FoodLog,
    pub total_calories: f64,
}

impl From<FoodLog> for FoodLogResponse {
    fn from(log: FoodLog) -> Self {
        let total_calories = log.total_calories();
        Self {
            log,
            total_calories,
        }
    }
}

/// A food line of a friend's meal, shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendFoodLine {
    pub log_id: i64,
    pub user_id: i64,
    pub username: String,
    pub timestamp: i64,
    pub food_name: String,
    pub calories: f64,
}

/// Request payload for logging a meal.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodLogRequest {
    pub user_id: i64,

    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub timestamp: i64,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,

    #[validate(length(min = 1, message = "At least one food item is required"), nested)]
    pub items: Vec<CreateFoodLogItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodLogItemRequest {
    pub food_id: i64,

    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: Option<i32>,

    #[validate(range(min = 0.0, message = "Calories cannot be negative"))]
    pub calories: Option<f64>,
}

/// Request payload for moving or re-timing a meal. Lines are edited
/// through [`CreateFoodLogEntryRequest`] and [`UpdateFoodLogEntryRequest`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFoodLogRequest {
    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub timestamp: Option<i64>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,
}

/// A single food line addressed on its own, with its owning log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogEntry {
    pub log_id: i64,
    #[serde(flatten)]
    pub item: FoodLogItem,
    pub line_calories: f64,
}

impl FoodLogEntry {
    pub fn new(log_id: i64, item: FoodLogItem) -> Self {
        let line_calories = item.calories();
        Self {
            log_id,
            item,
            line_calories,
        }
    }
}

/// Request payload for adding a line to an existing meal.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodLogEntryRequest {
    pub log_id: i64,
    pub food_id: i64,

    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: Option<i32>,

    #[validate(range(min = 0.0, message = "Calories cannot be negative"))]
    pub calories: Option<f64>,
}

/// Request payload for changing one line's quantity or calorie override.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFoodLogEntryRequest {
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: Option<i32>,

    #[validate(range(min = 0.0, message = "Calories cannot be negative"))]
    pub calories: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(food_calories: f64, quantity: Option<i32>, calories: Option<f64>) -> FoodLogItem {
        FoodLogItem {
            id: 1,
            food_id: 1,
            food_name: "Soto Ayam".to_string(),
            food_calories,
            quantity,
            calories,
        }
    }

    #[test]
    fn test_item_calories_uses_override() {
        assert_eq!(item(300.0, Some(2), Some(150.0)).calories(), 150.0);
    }

    #[test]
    fn test_item_calories_defaults_quantity_to_one() {
        assert_eq!(item(300.0, None, None).calories(), 300.0);
        assert_eq!(item(300.0, Some(3), None).calories(), 900.0);
    }

    #[test]
    fn test_total_calories() {
        let log = FoodLog {
            id: 1,
            user_id: 1,
            timestamp: 1_700_000_000_000,
            latitude: None,
            longitude: None,
            items: vec![item(100.0, Some(2), None), item(50.0, None, Some(75.0))],
        };
        assert_eq!(log.total_calories(), 275.0);
        assert!(log.position().is_none());

        let json = serde_json::to_value(FoodLogResponse::from(log)).unwrap();
        assert_eq!(json["totalCalories"], 275.0);
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
    }

    #[test]
    fn test_create_request_requires_items() {
        let request = CreateFoodLogRequest {
            user_id: 1,
            timestamp: Utc::now().timestamp_millis(),
            latitude: Some(-7.26),
            longitude: Some(112.74),
            items: vec![],
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    #[test]
    fn test_empty_items_error_carries_length_code() {
        let request = CreateFoodLogRequest {
            user_id: 1,
            timestamp: Utc::now().timestamp_millis(),
            latitude: None,
            longitude: None,
            items: vec![],
        };
        let errors = request.validate().unwrap_err();
        let items = &errors.field_errors()["items"];
        assert_eq!(items[0].code, "length");
        assert_eq!(
            items[0].message.as_deref(),
            Some("At least one food item is required")
        );
    }

    #[test]
    fn test_update_request_rejects_future_timestamp_and_bad_latitude() {
        let future = UpdateFoodLogRequest {
            timestamp: Some(Utc::now().timestamp_millis() + 3_600_000),
            ..Default::default()
        };
        assert!(future.validate().unwrap_err().field_errors().contains_key("timestamp"));

        let off_map = UpdateFoodLogRequest {
            latitude: Some(95.0),
            ..Default::default()
        };
        assert!(off_map.validate().unwrap_err().field_errors().contains_key("latitude"));
        assert!(UpdateFoodLogRequest::default().validate().is_ok());
    }

    #[test]
    fn test_entry_serializes_line_calories() {
        let entry = FoodLogEntry::new(12, item(200.0, Some(3), None));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["logId"], 12);
        assert_eq!(json["foodName"], "Soto Ayam");
        assert_eq!(json["lineCalories"], 600.0);
    }

    #[test]
    fn test_entry_requests_validate_quantity() {
        let create = CreateFoodLogEntryRequest {
            log_id: 1,
            food_id: 2,
            quantity: Some(0),
            calories: None,
        };
        assert!(create.validate().is_err());

        let update = UpdateFoodLogEntryRequest {
            calories: Some(-5.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_create_request_validates_nested_items() {
        let request = CreateFoodLogRequest {
            user_id: 1,
            timestamp: Utc::now().timestamp_millis(),
            latitude: None,
            longitude: None,
            items: vec![CreateFoodLogItemRequest {
                food_id: 1,
                quantity: Some(0),
                calories: None,
            }],
        };
        assert!(request.validate().is_err());
    }
}
