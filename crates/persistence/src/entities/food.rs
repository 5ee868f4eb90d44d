//! Food entity (database row mapping).

use domain::models::Food;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct FoodEntity {
    pub id: i64,
    pub name: String,
    pub calories: f64,
}

impl From<FoodEntity> for Food {
    fn from(entity: FoodEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            calories: entity.calories,
        }
    }
}
