//! Time-bucketed aggregation for the dashboard, progress and profile views.
//!
//! Calendar days are local to a fixed UTC offset: a day runs from local
//! midnight (inclusive) to the next local midnight (exclusive).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

use crate::error::DomainError;
use crate::models::activity_log::FriendActivity;
use crate::models::food_log::{FoodLogResponse, FriendFoodLine};
use crate::models::{Dashboard, DayBucket, DayTotal, LogEvent, Profile};
use crate::stores::{
    ActivityLogStore, FoodLogStore, FriendshipStore, Stores, UserStore, VisitLogStore,
};

pub const WEEKLY_PROGRESS_DAYS: u32 = 7;
pub const FRIEND_FEED_LIMIT: usize = 10;
pub const PROFILE_RECENT_FOOD_LOGS: i64 = 5;

/// BMI from weight and height, rounded to two decimals.
///
/// Reported as 0 when either value is missing or height is zero.
pub fn compute_bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> f64 {
    match (weight_kg, height_cm) {
        (Some(weight), Some(height)) if height > 0.0 => {
            let meters = height / 100.0;
            (weight / (meters * meters) * 100.0).round() / 100.0
        }
        _ => 0.0,
    }
}

pub struct Aggregator {
    users: Arc<dyn UserStore>,
    food_logs: Arc<dyn FoodLogStore>,
    activity_logs: Arc<dyn ActivityLogStore>,
    visit_logs: Arc<dyn VisitLogStore>,
    friendships: Arc<dyn FriendshipStore>,
    offset: FixedOffset,
}

impl Aggregator {
    pub fn new(stores: &Stores, offset: FixedOffset) -> Self {
        Self {
            users: stores.users.clone(),
            food_logs: stores.food_logs.clone(),
            activity_logs: stores.activity_logs.clone(),
            visit_logs: stores.visit_logs.clone(),
            friendships: stores.friendships.clone(),
            offset,
        }
    }

    /// The local calendar date at `now`.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Local date of an epoch-millisecond instant.
    fn date_of(&self, epoch_ms: i64) -> Option<NaiveDate> {
        DateTime::from_timestamp_millis(epoch_ms).map(|dt| self.local_date(dt))
    }

    /// `[start, end)` of a local calendar day, in epoch milliseconds.
    pub fn day_bounds(&self, date: NaiveDate) -> (i64, i64) {
        let offset_ms = i64::from(self.offset.local_minus_utc()) * 1000;
        let start = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() - offset_ms;
        (start, start + Duration::days(1).num_milliseconds())
    }

    async fn ensure_user(&self, user_id: i64) -> Result<(), DomainError> {
        if self.users.exists(user_id).await? {
            Ok(())
        } else {
            Err(DomainError::NotFound("User".to_string()))
        }
    }

    /// One bucket per day for the last `days` days ending today, oldest first.
    pub async fn daily_progress(&self, user_id: i64, days: u32) -> Result<Vec<DayBucket>, DomainError> {
        let today = self.local_date(Utc::now());
        self.daily_progress_until(user_id, days, today).await
    }

    pub async fn daily_progress_until(
        &self,
        user_id: i64,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<DayBucket>, DomainError> {
        if days == 0 {
            return Err(DomainError::validation("days", "Days must be at least 1"));
        }
        self.ensure_user(user_id).await?;

        let first = today - Duration::days(i64::from(days) - 1);
        let mut buckets: Vec<DayBucket> = first
            .iter_days()
            .take(days as usize)
            .map(DayBucket::empty)
            .collect();

        let (start, _) = self.day_bounds(first);
        let (_, end) = self.day_bounds(today);

        let (food_logs, activities) = tokio::try_join!(
            self.food_logs.find_in_range(user_id, start, end),
            self.activity_logs.find_in_range(user_id, start, end),
        )?;

        let index_of = |epoch_ms: i64| -> Option<usize> {
            let offset = (self.date_of(epoch_ms)? - first).num_days();
            usize::try_from(offset).ok().filter(|i| *i < buckets.len())
        };

        let mut calories = vec![0.0; buckets.len()];
        let mut counts = vec![0_i64; buckets.len()];
        for log in &food_logs {
            if let Some(i) = index_of(log.occurred_at_ms()) {
                calories[i] += log.total_calories();
            }
        }
        for activity in &activities {
            if let Some(i) = index_of(activity.occurred_at_ms()) {
                counts[i] += 1;
            }
        }

        for (i, bucket) in buckets.iter_mut().enumerate() {
            bucket.calories = calories[i];
            bucket.activity_count = counts[i];
        }
        Ok(buckets)
    }

    /// Totals for `[start, end)`.
    pub async fn day_total(&self, user_id: i64, start: i64, end: i64) -> Result<DayTotal, DomainError> {
        let (food_logs, activities, visits) = tokio::try_join!(
            self.food_logs.find_in_range(user_id, start, end),
            self.activity_logs.find_in_range(user_id, start, end),
            self.visit_logs.find_in_range(user_id, start, end),
        )?;

        Ok(DayTotal {
            calories: food_logs.iter().map(|l| l.total_calories()).sum(),
            activity_count: activities.len() as i64,
            visit_count: visits.len() as i64,
        })
    }

    pub async fn dashboard(&self, user_id: i64) -> Result<Dashboard, DomainError> {
        self.dashboard_at(user_id, Utc::now()).await
    }

    pub async fn dashboard_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<Dashboard, DomainError> {
        self.ensure_user(user_id).await?;

        let today = self.local_date(now);
        let (start, end) = self.day_bounds(today);
        let today_total = self.day_total(user_id, start, end).await?;
        let weekly_progress = self
            .daily_progress_until(user_id, WEEKLY_PROGRESS_DAYS, today)
            .await?;

        let friend_ids = self.friendships.accepted_friend_ids(user_id).await?;
        let (recent_friend_activities, recent_friend_food_logs) = if friend_ids.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            self.friend_feed(&friend_ids).await?
        };

        Ok(Dashboard {
            today: today_total,
            weekly_progress,
            recent_friend_activities,
            recent_friend_food_logs,
        })
    }

    async fn friend_feed(
        &self,
        friend_ids: &[i64],
    ) -> Result<(Vec<FriendActivity>, Vec<FriendFoodLine>), DomainError> {
        let limit = FRIEND_FEED_LIMIT as i64;
        let (friends, activities, food_logs) = tokio::try_join!(
            self.users.find_many(friend_ids),
            self.activity_logs.find_latest_for_users(friend_ids, limit),
            self.food_logs.find_latest_for_users(friend_ids, limit),
        )?;

        let usernames: HashMap<i64, String> =
            friends.into_iter().map(|u| (u.id, u.username)).collect();
        let username_of = |id: i64| usernames.get(&id).cloned().unwrap_or_default();

        let activities = activities
            .into_iter()
            .map(|activity| FriendActivity {
                username: username_of(activity.user_id),
                activity,
            })
            .collect();

        let food_lines = food_logs
            .iter()
            .flat_map(|log| {
                log.items.iter().map(move |item| FriendFoodLine {
                    log_id: log.id,
                    user_id: log.user_id,
                    username: username_of(log.user_id),
                    timestamp: log.timestamp,
                    food_name: item.food_name.clone(),
                    calories: item.calories(),
                })
            })
            .take(FRIEND_FEED_LIMIT)
            .collect();

        Ok((activities, food_lines))
    }

    pub async fn profile(&self, user_id: i64) -> Result<Profile, DomainError> {
        self.profile_at(user_id, Utc::now()).await
    }

    pub async fn profile_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<Profile, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User".to_string()))?;

        let (start, end) = self.day_bounds(self.local_date(now));
        let (today, recent) = tokio::try_join!(
            self.day_total(user_id, start, end),
            self.food_logs.find_latest(user_id, PROFILE_RECENT_FOOD_LOGS),
        )?;

        Ok(Profile {
            bmi: compute_bmi(user.weight_kg, user.height_cm),
            bmi_goal: user.bmi_goal,
            today,
            recent_food_logs: recent.into_iter().map(FoodLogResponse::from).collect(),
            user,
        })
    }
}
