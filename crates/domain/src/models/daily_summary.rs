//! Daily summary domain models.
//!
//! A daily summary is a user-recorded calorie intake figure for one local
//! calendar day. It is stored as entered and never derived from food logs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub total_calories_in: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDailySummaryRequest {
    pub user_id: i64,

    /// Local calendar date, `YYYY-MM-DD`.
    pub date: NaiveDate,

    #[validate(range(min = 0, message = "Total calories cannot be negative"))]
    pub total_calories_in: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDailySummaryRequest {
    pub date: Option<NaiveDate>,

    #[validate(range(min = 0, message = "Total calories cannot be negative"))]
    pub total_calories_in: Option<i32>,
}

/// Parses a `YYYY-MM-DD` path segment.
pub fn parse_summary_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_from_json() {
        let request: CreateDailySummaryRequest = serde_json::from_str(
            r#"{"userId": 3, "date": "2024-03-05", "totalCaloriesIn": 1850}"#,
        )
        .unwrap();
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert!(request.validate().is_ok());

        let negative = CreateDailySummaryRequest {
            total_calories_in: -1,
            ..request
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_update_request_is_partial() {
        let request: UpdateDailySummaryRequest =
            serde_json::from_str(r#"{"totalCaloriesIn": 2100}"#).unwrap();
        assert_eq!(request.date, None);
        assert_eq!(request.total_calories_in, Some(2100));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_parse_summary_date() {
        assert_eq!(
            parse_summary_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_summary_date("2023-02-29"), None);
        assert_eq!(parse_summary_date("05-03-2024"), None);
    }

    #[test]
    fn test_summary_serializes_date_as_string() {
        let summary = DailySummary {
            id: 1,
            user_id: 3,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            total_calories_in: 1850,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["totalCaloriesIn"], 1850);
    }
}
