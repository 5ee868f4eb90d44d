//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod activity_log;
pub mod daily_summary;
pub mod ema_log;
pub mod food;
pub mod food_log;
pub mod friendship;
pub mod place;
pub mod user;
pub mod visit_log;

pub use activity_log::ActivityLogEntity;
pub use daily_summary::DailySummaryEntity;
pub use ema_log::EmaLogEntity;
pub use food::FoodEntity;
pub use food_log::{FoodLogEntity, FoodLogItemEntity};
pub use friendship::FriendshipEntity;
pub use place::PlaceEntity;
pub use user::UserEntity;
pub use visit_log::{VisitLogEntity, VisitWithPlaceEntity};
