//! User account and summary endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::summary::{Dashboard, DayBucket, Profile};
use domain::models::user::{LoginRequest, RegisterUserRequest, UpdateUserRequest};
use domain::models::User;
use domain::services::aggregation::WEEKLY_PROGRESS_DAYS;
use persistence::repositories::UserRepository;
use serde::{Deserialize, Serialize};
use shared::password::{hash_password, verify_password};
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiQuery, ValidatedJson};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
}

/// Query parameters for daily progress.
#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub days: Option<u32>,
}

/// Register a new account.
///
/// POST /api/v1/users/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let repo = UserRepository::new(state.pool.clone());

    if repo.find_by_email(&request.email).await?.is_some() {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))??;

    let user: User = repo
        .create(
            request.username.trim(),
            &request.email,
            &password_hash,
            request.bmi_goal,
            request.height_cm,
            request.weight_kg,
        )
        .await?
        .into();

    info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Check credentials.
///
/// Unknown email and wrong password produce the same response.
///
/// POST /api/v1/users/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());

    let Some(entity) = repo.find_by_email(&request.email).await? else {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let password = request.password.clone();
    let stored_hash = entity.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password verification task failed: {}", e)))??;

    if !verified {
        warn!(user_id = entity.id, "Login rejected");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    info!(user_id = entity.id, "User logged in");

    Ok(Json(LoginResponse {
        user: entity.into(),
    }))
}

/// GET /api/v1/users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Partial update of profile fields.
///
/// PATCH /api/v1/users/:user_id
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user: User = repo
        .update(
            user_id,
            request.username.as_deref().map(str::trim),
            request.bmi_goal,
            request.height_cm,
            request.weight_kg,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into();

    info!(user_id = user.id, "User updated");

    Ok(Json(user))
}

/// BMI, today's totals and the latest meals.
///
/// GET /api/v1/users/:user_id/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.aggregator.profile(user_id).await?))
}

/// GET /api/v1/users/:user_id/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Dashboard>, ApiError> {
    Ok(Json(state.aggregator.dashboard(user_id).await?))
}

/// One bucket per local day, oldest first.
///
/// GET /api/v1/users/:user_id/progress?days=N
pub async fn get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ApiQuery(query): ApiQuery<ProgressQuery>,
) -> Result<Json<Vec<DayBucket>>, ApiError> {
    let max_days = state.config.limits.max_progress_days;
    let days = query.days.unwrap_or(WEEKLY_PROGRESS_DAYS);
    if days < 1 || days > max_days {
        return Err(ApiError::field(
            "days",
            format!("days must be between 1 and {}", max_days),
        ));
    }

    Ok(Json(state.aggregator.daily_progress(user_id, days).await?))
}
