//! Mood (EMA) log domain models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::log_event::{position_of, LogEvent};
use super::trigger::Position;

/// An ecological momentary assessment: mood score and context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmaLog {
    pub id: i64,
    pub user_id: i64,
    /// 1 (worst) to 10 (best).
    pub mood_score: i32,
    pub context: Option<String>,
    pub timestamp: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LogEvent for EmaLog {
    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn occurred_at_ms(&self) -> i64 {
        self.timestamp
    }

    fn position(&self) -> Option<Position> {
        position_of(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmaLogRequest {
    pub user_id: i64,

    #[validate(range(min = 1, max = 10, message = "Mood score must be between 1 and 10"))]
    pub mood_score: i32,

    #[validate(length(max = 500, message = "Context must be at most 500 characters"))]
    pub context: Option<String>,

    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub timestamp: i64,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,
}

/// Trimmed context; blank context is stored as absent.
pub fn normalize_context(context: Option<&str>) -> Option<String> {
    context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Request payload for a partial mood log update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmaLogRequest {
    #[validate(range(min = 1, max = 10, message = "Mood score must be between 1 and 10"))]
    pub mood_score: Option<i32>,

    #[validate(length(max = 500, message = "Context must be at most 500 characters"))]
    pub context: Option<String>,

    #[validate(custom(function = "shared::validation::validate_epoch_millis"))]
    pub timestamp: Option<i64>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,
}

impl UpdateEmaLogRequest {
    /// Merges the provided fields over `existing`. A blank context clears it.
    pub fn apply(&self, existing: &EmaLog) -> EmaLog {
        EmaLog {
            mood_score: self.mood_score.unwrap_or(existing.mood_score),
            context: match &self.context {
                Some(context) => normalize_context(Some(context)),
                None => existing.context.clone(),
            },
            timestamp: self.timestamp.unwrap_or(existing.timestamp),
            latitude: self.latitude.or(existing.latitude),
            longitude: self.longitude.or(existing.longitude),
            ..existing.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(mood_score: i32) -> CreateEmaLogRequest {
        CreateEmaLogRequest {
            user_id: 1,
            mood_score,
            context: Some("Sore walk".to_string()),
            timestamp: Utc::now().timestamp_millis(),
            latitude: Some(-7.2913),
            longitude: Some(112.7398),
        }
    }

    #[test]
    fn test_mood_score_bounds() {
        assert!(request(1).validate().is_ok());
        assert!(request(10).validate().is_ok());
        assert!(request(0).validate().is_err());
        assert!(request(11).validate().is_err());
    }

    #[test]
    fn test_context_length() {
        let mut long = request(5);
        long.context = Some("x".repeat(501));
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_normalize_context() {
        assert_eq!(normalize_context(Some("  hujan ")), Some("hujan".to_string()));
        assert_eq!(normalize_context(Some("   ")), None);
        assert_eq!(normalize_context(None), None);
    }

    #[test]
    fn test_update_merges_and_clears_blank_context() {
        let existing = EmaLog {
            id: 2,
            user_id: 1,
            mood_score: 4,
            context: Some("Macet".to_string()),
            timestamp: 1_700_000_000_000,
            latitude: Some(-7.29),
            longitude: Some(112.74),
        };

        let merged = UpdateEmaLogRequest {
            mood_score: Some(8),
            ..Default::default()
        }
        .apply(&existing);
        assert_eq!(merged.mood_score, 8);
        assert_eq!(merged.context.as_deref(), Some("Macet"));
        assert_eq!(merged.latitude, Some(-7.29));

        let cleared = UpdateEmaLogRequest {
            context: Some(" ".to_string()),
            ..Default::default()
        }
        .apply(&existing);
        assert_eq!(cleared.context, None);
    }

    #[test]
    fn test_update_mood_bounds() {
        let update = UpdateEmaLogRequest {
            mood_score: Some(0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_position_requires_both_coordinates() {
        let log = EmaLog {
            id: 1,
            user_id: 1,
            mood_score: 7,
            context: None,
            timestamp: 1_700_000_000_000,
            latitude: Some(-7.29),
            longitude: None,
        };
        assert!(log.position().is_none());

        let located = EmaLog {
            longitude: Some(112.74),
            ..log
        };
        assert_eq!(located.position(), Some(Position::new(-7.29, 112.74)));
    }
}
