use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use shared::password::PasswordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Out of region: {0}")]
    OutOfRegion(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Validation failure attributed to a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        ApiError::Validation {
            details: vec![ValidationDetail {
                field: field.to_string(),
                message: message.clone(),
            }],
            message,
        }
    }

    /// Validation failure with no field attribution.
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: vec![],
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                (!details.is_empty()).then_some(details),
            ),
            ApiError::OutOfRegion(msg) => (StatusCode::BAD_REQUEST, "out_of_region", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_details(&errors, "", &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation { message, details }
    }
}

/// Flattens nested struct and list errors into dotted field paths
/// (`items[0].quantity`).
fn collect_details(errors: &validator::ValidationErrors, prefix: &str, out: &mut Vec<ValidationDetail>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let field = camel_case(field);
        let path = if prefix.is_empty() {
            field
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| ValidationDetail {
                    field: path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_details(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

/// Request bodies are camelCase on the wire; report fields the same way.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, message } => ApiError::field(&field, message),
            err @ DomainError::OutOfRegion { .. } => ApiError::OutOfRegion(err.to_string()),
            err @ DomainError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::Storage(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_api_error_status_codes() {
        let cases = [
            (ApiError::invalid("bad"), StatusCode::BAD_REQUEST),
            (ApiError::OutOfRegion("far".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                ApiError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_field_error_body_names_field() {
        let body = body_json(ApiError::field("latitude", "Latitude must be a number").into_response()).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], "latitude");
    }

    #[tokio::test]
    async fn test_out_of_region_error_code() {
        let err: ApiError = DomainError::OutOfRegion {
            region: "Surabaya".into(),
            latitude: 0.0,
            longitude: 0.0,
        }
        .into();
        let body = body_json(err.into_response()).await;
        assert_eq!(body["error"], "out_of_region");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_message_is_redacted() {
        let body = body_json(ApiError::Internal("password=hunter2".into()).into_response()).await;
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_domain_not_found_maps_to_not_found() {
        let err: ApiError = DomainError::NotFound("User".into()).into();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "User not found"));
    }

    #[test]
    fn test_domain_storage_maps_to_internal() {
        let err: ApiError = DomainError::Storage("connection reset".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::NotFound(ref m) if m == "Resource not found"));
    }

    #[derive(Validate)]
    struct MoodForm {
        #[validate(range(min = 1, max = 10, message = "Mood score must be between 1 and 10"))]
        mood_score: i32,
    }

    #[test]
    fn test_from_validation_errors_single_field() {
        let errors = MoodForm { mood_score: 11 }.validate().unwrap_err();
        match ApiError::from(errors) {
            ApiError::Validation { message, details } => {
                assert_eq!(message, "Mood score must be between 1 and 10");
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "moodScore");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("bmi_goal"), "bmiGoal");
        assert_eq!(camel_case("items"), "items");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ApiError::NotFound("Place".into()).to_string(),
            "Not found: Place"
        );
        assert_eq!(
            ApiError::invalid("bad input").to_string(),
            "Validation error: bad input"
        );
    }
}
