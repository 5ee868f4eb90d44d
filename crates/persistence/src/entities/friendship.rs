//! Friendship entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Friendship, FriendshipStatus};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct FriendshipEntity {
    pub id: i64,
    pub requester_id: i64,
    pub addressee_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<FriendshipEntity> for Friendship {
    fn from(entity: FriendshipEntity) -> Self {
        Self {
            id: entity.id,
            requester_id: entity.requester_id,
            addressee_id: entity.addressee_id,
            status: entity.status.parse().unwrap_or(FriendshipStatus::Pending),
            created_at: entity.created_at,
        }
    }
}
