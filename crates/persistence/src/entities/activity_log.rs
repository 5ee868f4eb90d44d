//! Activity log entity (database row mapping).

use domain::models::ActivityLog;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogEntity {
    pub id: i64,
    pub user_id: i64,
    pub activity_type: String,
    pub start_time: i64,
    pub end_time: i64,
    pub confidence: i32,
}

impl From<ActivityLogEntity> for ActivityLog {
    fn from(entity: ActivityLogEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            activity_type: entity.activity_type,
            start_time: entity.start_time,
            end_time: entity.end_time,
            confidence: entity.confidence,
        }
    }
}
