//! Domain models for the health tracker.

pub mod activity_log;
pub mod daily_summary;
pub mod ema_log;
pub mod food;
pub mod food_log;
pub mod friendship;
pub mod log_event;
pub mod place;
pub mod summary;
pub mod trigger;
pub mod user;
pub mod visit_log;

pub use activity_log::ActivityLog;
pub use daily_summary::DailySummary;
pub use ema_log::EmaLog;
pub use food::Food;
pub use food_log::{FoodLog, FoodLogEntry, FoodLogItem};
pub use friendship::{Friendship, FriendshipStatus};
pub use log_event::LogEvent;
pub use place::{NearbyPlace, Place, PlaceCategory};
pub use summary::{Dashboard, DayBucket, DayTotal, Profile};
pub use trigger::{NotificationType, Position, Trigger, TriggerPriority};
pub use user::User;
pub use visit_log::VisitLog;
