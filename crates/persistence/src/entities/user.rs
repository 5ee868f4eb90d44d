//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::User;
use sqlx::FromRow;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub bmi_goal: Option<f64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            password_hash: entity.password_hash,
            bmi_goal: entity.bmi_goal,
            height_cm: entity.height_cm,
            weight_kg: entity.weight_kg,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
