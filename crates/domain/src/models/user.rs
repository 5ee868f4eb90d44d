//! User account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Represents a user account in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub bmi_goal: Option<f64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for user registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(range(min = 10.0, max = 50.0, message = "BMI goal must be between 10 and 50"))]
    pub bmi_goal: Option<f64>,

    #[validate(range(exclusive_min = 0.0, max = 300.0, message = "Height must be positive"))]
    pub height_cm: Option<f64>,

    #[validate(range(exclusive_min = 0.0, max = 500.0, message = "Weight must be positive"))]
    pub weight_kg: Option<f64>,
}

/// Request payload for login.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request payload for a partial profile update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    pub username: Option<String>,

    #[validate(range(min = 10.0, max = 50.0, message = "BMI goal must be between 10 and 50"))]
    pub bmi_goal: Option<f64>,

    #[validate(range(exclusive_min = 0.0, max = 300.0, message = "Height must be positive"))]
    pub height_cm: Option<f64>,

    #[validate(range(exclusive_min = 0.0, max = 500.0, message = "Weight must be positive"))]
    pub weight_kg: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::{Password, SafeEmail};
    use fake::Fake;

    fn user() -> User {
        User {
            id: 1,
            username: "andini".to_string(),
            email: "andini@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            bmi_goal: Some(22.0),
            height_cm: Some(160.0),
            weight_kg: Some(55.0),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let json = serde_json::to_string(&user()).unwrap();
        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("secret"));
        assert!(json.contains("\"bmiGoal\":22.0"));
    }

    #[test]
    fn test_register_request_valid() {
        let request = RegisterUserRequest {
            username: "andini".to_string(),
            email: SafeEmail().fake(),
            password: Password(8..20).fake(),
            bmi_goal: Some(21.5),
            height_cm: Some(160.0),
            weight_kg: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_short_username_and_bad_email() {
        let request = RegisterUserRequest {
            username: "ab".to_string(),
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
            bmi_goal: None,
            height_cm: None,
            weight_kg: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_register_request_bmi_goal_bounds() {
        let base = RegisterUserRequest {
            username: "andini".to_string(),
            email: "andini@example.com".to_string(),
            password: "longenough".to_string(),
            bmi_goal: Some(9.9),
            height_cm: None,
            weight_kg: None,
        };
        assert!(base.validate().is_err());

        let upper = RegisterUserRequest {
            bmi_goal: Some(50.0),
            ..base
        };
        assert!(upper.validate().is_ok());
    }

    #[test]
    fn test_update_request_rejects_zero_height() {
        let request = UpdateUserRequest {
            height_cm: Some(0.0),
            ..Default::default()
        };
        assert!(request.validate().is_err());
        assert!(UpdateUserRequest::default().validate().is_ok());
    }
}
