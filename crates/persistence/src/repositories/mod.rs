//! Repository implementations for database operations.
//!
//! Each repository also implements the matching domain store trait so the
//! domain services can read through it.

pub mod activity_log;
pub mod daily_summary;
pub mod ema_log;
pub mod food;
pub mod food_log;
pub mod friendship;
pub mod place;
pub mod user;
pub mod visit_log;

use std::sync::Arc;

use domain::stores::Stores;
use sqlx::PgPool;

pub use activity_log::{ActivityLogRepository, NewActivityLog};
pub use daily_summary::DailySummaryRepository;
pub use ema_log::EmaLogRepository;
pub use food::FoodRepository;
pub use food_log::{FoodLogRepository, NewFoodLogItem};
pub use friendship::FriendshipRepository;
pub use place::PlaceRepository;
pub use user::UserRepository;
pub use visit_log::VisitLogRepository;

/// PostgreSQL-backed implementations of every domain store.
pub fn postgres_stores(pool: &PgPool) -> Stores {
    Stores {
        users: Arc::new(UserRepository::new(pool.clone())),
        places: Arc::new(PlaceRepository::new(pool.clone())),
        food_logs: Arc::new(FoodLogRepository::new(pool.clone())),
        activity_logs: Arc::new(ActivityLogRepository::new(pool.clone())),
        ema_logs: Arc::new(EmaLogRepository::new(pool.clone())),
        visit_logs: Arc::new(VisitLogRepository::new(pool.clone())),
        friendships: Arc::new(FriendshipRepository::new(pool.clone())),
    }
}
