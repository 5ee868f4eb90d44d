//! EMA (mood) log entity (database row mapping).

use domain::models::EmaLog;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct EmaLogEntity {
    pub id: i64,
    pub user_id: i64,
    pub mood_score: i32,
    pub context: Option<String>,
    pub timestamp: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<EmaLogEntity> for EmaLog {
    fn from(entity: EmaLogEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            mood_score: entity.mood_score,
            context: entity.context,
            timestamp: entity.timestamp,
            latitude: entity.latitude,
            longitude: entity.longitude,
        }
    }
}
