//! Daily summary entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::DailySummary;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct DailySummaryEntity {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub total_calories_in: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DailySummaryEntity> for DailySummary {
    fn from(entity: DailySummaryEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            date: entity.date,
            total_calories_in: entity.total_calories_in,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
