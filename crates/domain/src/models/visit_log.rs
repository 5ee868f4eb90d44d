//! Visit log domain models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::log_event::LogEvent;
use super::place::PlaceCategory;
use crate::DomainError;

/// A user's stay at a place of interest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitLog {
    pub id: i64,
    pub user_id: i64,
    pub place_id: i64,
    pub entry_time: i64,
    pub exit_time: i64,
    pub duration_mins: i32,
}

impl LogEvent for VisitLog {
    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn occurred_at_ms(&self) -> i64 {
        self.entry_time
    }
}

/// A visit joined with the visited place.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitWithPlace {
    #[serde(flatten)]
    pub visit: VisitLog,
    pub place_name: String,
    pub place_category: PlaceCategory,
}

/// Request payload for logging a visit.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitLogRequest {
    pub user_id: i64,
    pub place_id: i64,

    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub entry_time: i64,

    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub exit_time: i64,

    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    pub duration_mins: i32,
}

fn check_order(entry_time: i64, exit_time: i64) -> Result<(), DomainError> {
    if exit_time < entry_time {
        return Err(DomainError::validation(
            "exitTime",
            "Exit time cannot be before entry time",
        ));
    }
    Ok(())
}

/// Whole minutes between entry and exit.
pub fn duration_minutes(entry_time: i64, exit_time: i64) -> i32 {
    i32::try_from((exit_time - entry_time) / 60_000).unwrap_or(i32::MAX)
}

impl CreateVisitLogRequest {
    pub fn check_time_order(&self) -> Result<(), DomainError> {
        check_order(self.entry_time, self.exit_time)
    }
}

/// Request payload for a partial visit update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVisitLogRequest {
    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub entry_time: Option<i64>,

    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub exit_time: Option<i64>,

    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    pub duration_mins: Option<i32>,
}

impl UpdateVisitLogRequest {
    /// Merges the provided fields over `existing`.
    ///
    /// When either end of the stay moves, the duration is recomputed from
    /// the merged times and any `durationMins` in the request is ignored.
    pub fn apply(&self, existing: &VisitLog) -> Result<VisitLog, DomainError> {
        let entry_time = self.entry_time.unwrap_or(existing.entry_time);
        let exit_time = self.exit_time.unwrap_or(existing.exit_time);
        check_order(entry_time, exit_time)?;

        let times_changed = entry_time != existing.entry_time || exit_time != existing.exit_time;
        let duration_mins = if times_changed {
            duration_minutes(entry_time, exit_time)
        } else {
            self.duration_mins.unwrap_or(existing.duration_mins)
        };

        Ok(VisitLog {
            entry_time,
            exit_time,
            duration_mins,
            ..existing.clone()
        })
    }
}
