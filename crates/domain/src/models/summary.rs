//! Aggregated views: day buckets, dashboard and profile.

use chrono::NaiveDate;
use serde::Serialize;

use super::activity_log::FriendActivity;
use super::food_log::{FoodLogResponse, FriendFoodLine};
use super::user::User;

/// Per-day totals for one user, keyed by local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: NaiveDate,
    pub calories: f64,
    pub activity_count: i64,
}

impl DayBucket {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            calories: 0.0,
            activity_count: 0,
        }
    }
}

/// Totals for a single time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotal {
    pub calories: f64,
    pub activity_count: i64,
    pub visit_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: DayTotal,
    pub weekly_progress: Vec<DayBucket>,
    pub recent_friend_activities: Vec<FriendActivity>,
    pub recent_friend_food_logs: Vec<FriendFoodLine>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user: User,
    pub bmi: f64,
    pub bmi_goal: Option<f64>,
    pub today: DayTotal,
    pub recent_food_logs: Vec<FoodLogResponse>,
}
