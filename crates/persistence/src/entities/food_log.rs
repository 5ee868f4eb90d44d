//! Food log entities (database row mappings).

use domain::models::{FoodLog, FoodLogEntry, FoodLogItem};
use sqlx::FromRow;

/// Database row mapping for the food_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct FoodLogEntity {
    pub id: i64,
    pub user_id: i64,
    pub timestamp: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A food_log_items row joined with its food.
#[derive(Debug, Clone, FromRow)]
pub struct FoodLogItemEntity {
    pub id: i64,
    pub log_id: i64,
    pub food_id: i64,
    pub food_name: String,
    pub food_calories: f64,
    pub quantity: Option<i32>,
    pub calories: Option<f64>,
}

impl From<FoodLogItemEntity> for FoodLogItem {
    fn from(entity: FoodLogItemEntity) -> Self {
        Self {
            id: entity.id,
            food_id: entity.food_id,
            food_name: entity.food_name,
            food_calories: entity.food_calories,
            quantity: entity.quantity,
            calories: entity.calories,
        }
    }
}

impl From<FoodLogItemEntity> for FoodLogEntry {
    fn from(entity: FoodLogItemEntity) -> Self {
        let log_id = entity.log_id;
        FoodLogEntry::new(log_id, entity.into())
    }
}

impl FoodLogEntity {
    /// Assembles the domain log from this row and its item rows.
    ///
    /// Items belonging to other logs are ignored.
    pub fn into_food_log(self, items: &[FoodLogItemEntity]) -> FoodLog {
        FoodLog {
            items: items
                .iter()
                .filter(|item| item.log_id == self.id)
                .cloned()
                .map(FoodLogItem::from)
                .collect(),
            id: self.id,
            user_id: self.user_id,
            timestamp: self.timestamp,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
