//! Activity log domain models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::log_event::LogEvent;
use crate::DomainError;

/// Activity types that count as a workout for gym suppression.
pub const WORKOUT_ACTIVITY_TYPES: [&str; 4] = ["WEIGHTLIFTING", "RUNNING", "CYCLING", "YOGA"];

/// A detected or manually entered physical activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: i64,
    pub user_id: i64,
    /// Upper-case activity label, e.g. `RUNNING`.
    pub activity_type: String,
    pub start_time: i64,
    pub end_time: i64,
    /// Detection confidence, 0-100.
    pub confidence: i32,
}

impl ActivityLog {
    pub fn is_workout(&self) -> bool {
        is_workout_type(&self.activity_type)
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_time - self.start_time
    }
}

pub fn is_workout_type(activity_type: &str) -> bool {
    WORKOUT_ACTIVITY_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(activity_type))
}

impl LogEvent for ActivityLog {
    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn occurred_at_ms(&self) -> i64 {
        self.start_time
    }
}

/// An accepted friend's activity, shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendActivity {
    #[serde(flatten)]
    pub activity: ActivityLog,
    pub username: String,
}

/// Request payload for logging an activity.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityLogRequest {
    pub user_id: i64,

    #[validate(
        length(min = 1, max = 100, message = "Activity type must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub activity_type: String,

    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub start_time: i64,

    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub end_time: i64,

    #[validate(range(min = 0, max = 100, message = "Confidence must be between 0 and 100"))]
    pub confidence: i32,
}

/// Activity labels are stored upper case.
pub fn normalize_activity_type(activity_type: &str) -> String {
    activity_type.trim().to_uppercase()
}

fn check_order(field: &str, start_time: i64, end_time: i64) -> Result<(), DomainError> {
    if end_time < start_time {
        return Err(DomainError::validation(
            field,
            "End time cannot be before start time",
        ));
    }
    Ok(())
}

impl CreateActivityLogRequest {
    pub fn normalized_type(&self) -> String {
        normalize_activity_type(&self.activity_type)
    }

    pub fn check_time_order(&self) -> Result<(), DomainError> {
        check_order("endTime", self.start_time, self.end_time)
    }
}

/// Batch upload of activities detected on a device.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkCreateActivityLogsRequest {
    #[validate(
        length(min = 1, max = 500, message = "Between 1 and 500 activities per upload"),
        nested
    )]
    pub activities: Vec<CreateActivityLogRequest>,
}

impl BulkCreateActivityLogsRequest {
    /// Reports the first reversed entry as `activities[i].endTime`.
    pub fn check_time_order(&self) -> Result<(), DomainError> {
        for (index, activity) in self.activities.iter().enumerate() {
            check_order(
                &format!("activities[{}].endTime", index),
                activity.start_time,
                activity.end_time,
            )?;
        }
        Ok(())
    }

    /// Distinct user ids referenced by the batch, sorted.
    pub fn user_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.activities.iter().map(|a| a.user_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Request payload for a partial activity update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityLogRequest {
    #[validate(
        length(min = 1, max = 100, message = "Activity type must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub activity_type: Option<String>,

    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub start_time: Option<i64>,

    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub end_time: Option<i64>,

    #[validate(range(min = 0, max = 100, message = "Confidence must be between 0 and 100"))]
    pub confidence: Option<i32>,
}

impl UpdateActivityLogRequest {
    /// Merges the provided fields over `existing`.
    ///
    /// The merged interval must still end at or after its start.
    pub fn apply(&self, existing: &ActivityLog) -> Result<ActivityLog, DomainError> {
        let merged = ActivityLog {
            activity_type: self
                .activity_type
                .as_deref()
                .map(normalize_activity_type)
                .unwrap_or_else(|| existing.activity_type.clone()),
            start_time: self.start_time.unwrap_or(existing.start_time),
            end_time: self.end_time.unwrap_or(existing.end_time),
            confidence: self.confidence.unwrap_or(existing.confidence),
            ..existing.clone()
        };
        check_order("endTime", merged.start_time, merged.end_time)?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(start_time: i64, end_time: i64) -> CreateActivityLogRequest {
        CreateActivityLogRequest {
            user_id: 1,
            activity_type: " running ".to_string(),
            start_time,
            end_time,
            confidence: 80,
        }
    }

    #[test]
    fn test_workout_types_case_insensitive() {
        assert!(is_workout_type("RUNNING"));
        assert!(is_workout_type("yoga"));
        assert!(is_workout_type("Cycling"));
        assert!(!is_workout_type("WALKING"));
        assert!(!is_workout_type("STILL"));
    }

    #[test]
    fn test_normalized_type() {
        assert_eq!(request(1, 2).normalized_type(), "RUNNING");
    }

    #[test]
    fn test_create_request_time_order() {
        let now = Utc::now().timestamp_millis();
        assert!(request(now - 60_000, now).check_time_order().is_ok());
        assert!(request(now, now).check_time_order().is_ok());

        let err = request(now, now - 60_000).check_time_order().unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "endTime"));
    }

    #[test]
    fn test_create_request_confidence_range() {
        let now = Utc::now().timestamp_millis();
        let mut bad = request(now - 1_000, now);
        bad.confidence = 101;
        assert!(bad.validate().is_err());
    }

    fn stored() -> ActivityLog {
        ActivityLog {
            id: 4,
            user_id: 1,
            activity_type: "WALKING".to_string(),
            start_time: 1_700_000_000_000,
            end_time: 1_700_000_900_000,
            confidence: 70,
        }
    }

    #[test]
    fn test_update_merges_over_existing() {
        let update = UpdateActivityLogRequest {
            activity_type: Some(" cycling".to_string()),
            confidence: Some(95),
            ..Default::default()
        };
        let merged = update.apply(&stored()).unwrap();

        assert_eq!(merged.id, 4);
        assert_eq!(merged.activity_type, "CYCLING");
        assert_eq!(merged.confidence, 95);
        assert_eq!(merged.start_time, 1_700_000_000_000);
        assert_eq!(merged.end_time, 1_700_000_900_000);
    }

    #[test]
    fn test_update_checks_merged_time_order() {
        // Only the start moves, past the stored end.
        let update = UpdateActivityLogRequest {
            start_time: Some(1_700_001_000_000),
            ..Default::default()
        };
        let err = update.apply(&stored()).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "endTime"));
    }

    #[test]
    fn test_update_rejects_blank_type() {
        let update = UpdateActivityLogRequest {
            activity_type: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(UpdateActivityLogRequest::default().validate().is_ok());
    }

    #[test]
    fn test_bulk_request_bounds_and_order() {
        let now = Utc::now().timestamp_millis();
        let empty = BulkCreateActivityLogsRequest { activities: vec![] };
        assert!(empty.validate().unwrap_err().field_errors().contains_key("activities"));

        let batch = BulkCreateActivityLogsRequest {
            activities: vec![
                request(now - 120_000, now - 60_000),
                request(now, now - 1_000),
            ],
        };
        assert!(batch.validate().is_ok());
        let err = batch.check_time_order().unwrap_err();
        assert!(
            matches!(err, DomainError::Validation { ref field, .. } if field == "activities[1].endTime")
        );
    }

    #[test]
    fn test_bulk_user_ids_are_distinct() {
        let mut second = request(1, 2);
        second.user_id = 7;
        let batch = BulkCreateActivityLogsRequest {
            activities: vec![request(1, 2), second, request(3, 4)],
        };
        assert_eq!(batch.user_ids(), vec![1, 7]);
    }

    #[test]
    fn test_activity_log_event_uses_start_time() {
        let log = ActivityLog {
            id: 1,
            user_id: 9,
            activity_type: "YOGA".to_string(),
            start_time: 1_700_000_000_000,
            end_time: 1_700_000_600_000,
            confidence: 90,
        };
        assert_eq!(log.occurred_at_ms(), 1_700_000_000_000);
        assert_eq!(log.duration_ms(), 600_000);
        assert!(log.is_workout());
    }
}
