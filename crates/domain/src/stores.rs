//! Read-side store traits consumed by the domain services.
//!
//! The persistence crate implements each trait over PostgreSQL; the
//! [`crate::testing::InMemoryStore`] implements all of them for tests.
//! Time ranges are epoch milliseconds, start inclusive and end exclusive.

use std::sync::Arc;

use async_trait::async_trait;
use shared::geo::BoundingBox;

use crate::error::DomainError;
use crate::models::visit_log::VisitWithPlace;
use crate::models::{ActivityLog, EmaLog, FoodLog, Place, User, VisitLog};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists(&self, user_id: i64) -> Result<bool, DomainError>;

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, DomainError>;

    async fn find_many(&self, user_ids: &[i64]) -> Result<Vec<User>, DomainError>;
}

#[async_trait]
pub trait PlaceStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Place>, DomainError>;

    async fn find_by_id(&self, place_id: i64) -> Result<Option<Place>, DomainError>;
}

#[async_trait]
pub trait FoodLogStore: Send + Sync {
    /// Logs with `timestamp >= since`, optionally restricted to logs whose
    /// position falls inside `area`. Logs without a position never match an
    /// area.
    async fn find_recent(
        &self,
        user_id: i64,
        since: i64,
        area: Option<BoundingBox>,
    ) -> Result<Vec<FoodLog>, DomainError>;

    async fn find_in_range(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<FoodLog>, DomainError>;

    /// Newest first.
    async fn find_latest(&self, user_id: i64, limit: i64) -> Result<Vec<FoodLog>, DomainError>;

    /// Newest first across all `user_ids`.
    async fn find_latest_for_users(
        &self,
        user_ids: &[i64],
        limit: i64,
    ) -> Result<Vec<FoodLog>, DomainError>;
}

#[async_trait]
pub trait ActivityLogStore: Send + Sync {
    /// Activities with `start_time >= since`.
    async fn find_recent(&self, user_id: i64, since: i64)
        -> Result<Vec<ActivityLog>, DomainError>;

    /// Activities whose start time falls in the range.
    async fn find_in_range(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<ActivityLog>, DomainError>;

    async fn find_latest_for_users(
        &self,
        user_ids: &[i64],
        limit: i64,
    ) -> Result<Vec<ActivityLog>, DomainError>;
}

#[async_trait]
pub trait EmaLogStore: Send + Sync {
    async fn find_recent(
        &self,
        user_id: i64,
        since: i64,
        area: Option<BoundingBox>,
    ) -> Result<Vec<EmaLog>, DomainError>;
}

#[async_trait]
pub trait VisitLogStore: Send + Sync {
    /// Visits with `entry_time >= since`, optionally for one place only.
    async fn find_recent(
        &self,
        user_id: i64,
        place_id: Option<i64>,
        since: i64,
    ) -> Result<Vec<VisitLog>, DomainError>;

    /// Visits whose entry time falls in the range.
    async fn find_in_range(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<VisitLog>, DomainError>;

    /// Newest first, joined with the visited place.
    async fn find_latest_with_place(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<VisitWithPlace>, DomainError>;
}

#[async_trait]
pub trait FriendshipStore: Send + Sync {
    async fn accepted_friend_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError>;
}

/// The full set of stores the services read from.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub places: Arc<dyn PlaceStore>,
    pub food_logs: Arc<dyn FoodLogStore>,
    pub activity_logs: Arc<dyn ActivityLogStore>,
    pub ema_logs: Arc<dyn EmaLogStore>,
    pub visit_logs: Arc<dyn VisitLogStore>,
    pub friendships: Arc<dyn FriendshipStore>,
}
