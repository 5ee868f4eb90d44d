//! Mood (EMA) log endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::ema_log::{normalize_context, CreateEmaLogRequest, UpdateEmaLogRequest};
use domain::models::EmaLog;
use persistence::repositories::{EmaLogRepository, UserRepository};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiQuery, ValidatedJson};
use crate::routes::{LocationQuery, RangeQuery};

/// POST /api/v1/ema-logs
pub async fn create_ema_log(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateEmaLogRequest>,
) -> Result<(StatusCode, Json<EmaLog>), ApiError> {
    let user_repo = UserRepository::new(state.pool.clone());
    if !user_repo.exists(request.user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let context = normalize_context(request.context.as_deref());

    let repo = EmaLogRepository::new(state.pool.clone());
    let log: EmaLog = repo
        .create(
            request.user_id,
            request.mood_score,
            context.as_deref(),
            request.timestamp,
            request.latitude,
            request.longitude,
        )
        .await?
        .into();

    info!(log_id = log.id, user_id = log.user_id, "Mood log created");

    Ok((StatusCode::CREATED, Json(log)))
}

/// GET /api/v1/ema-logs/:log_id
pub async fn get_ema_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<Json<EmaLog>, ApiError> {
    let repo = EmaLogRepository::new(state.pool.clone());
    let log = repo
        .find_by_id(log_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Mood log not found".to_string()))?;

    Ok(Json(log.into()))
}

/// GET /api/v1/ema-logs/user/:user_id
pub async fn list_user_ema_logs(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<EmaLog>>, ApiError> {
    let repo = EmaLogRepository::new(state.pool.clone());
    let logs = repo.find_by_user(user_id).await?;
    Ok(Json(logs.into_iter().map(EmaLog::from).collect()))
}

/// GET /api/v1/ema-logs/user/:user_id/range?start=&end=
pub async fn list_user_ema_logs_in_range(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ApiQuery(range): ApiQuery<RangeQuery>,
) -> Result<Json<Vec<EmaLog>>, ApiError> {
    let (start, end) = range.checked()?;
    let repo = EmaLogRepository::new(state.pool.clone());
    let logs = repo.find_by_user_between(user_id, start, end).await?;
    Ok(Json(logs.into_iter().map(EmaLog::from).collect()))
}

/// Mood logs recorded within `radiusKm` of a point.
///
/// GET /api/v1/ema-logs/user/:user_id/location?latitude=&longitude=&radiusKm=
pub async fn list_user_ema_logs_near(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ApiQuery(query): ApiQuery<LocationQuery>,
) -> Result<Json<Vec<EmaLog>>, ApiError> {
    let position = query.position()?;
    let radius_km = query.radius_km(state.config.triggers.default_nearby_radius_km)?;

    let repo = EmaLogRepository::new(state.pool.clone());
    let logs = repo
        .find_by_user_near(user_id, position.latitude, position.longitude, radius_km)
        .await?;
    Ok(Json(logs.into_iter().map(EmaLog::from).collect()))
}

/// Partial update. A blank `context` clears it.
///
/// PATCH /api/v1/ema-logs/:log_id
pub async fn update_ema_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateEmaLogRequest>,
) -> Result<Json<EmaLog>, ApiError> {
    let repo = EmaLogRepository::new(state.pool.clone());
    let existing: EmaLog = repo
        .find_by_id(log_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Mood log not found".to_string()))?
        .into();

    let log: EmaLog = repo
        .update(&request.apply(&existing))
        .await?
        .ok_or_else(|| ApiError::NotFound("Mood log not found".to_string()))?
        .into();

    info!(log_id, "Mood log updated");

    Ok(Json(log))
}

/// DELETE /api/v1/ema-logs/:log_id
pub async fn delete_ema_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = EmaLogRepository::new(state.pool.clone());
    if repo.delete(log_id).await? == 0 {
        return Err(ApiError::NotFound("Mood log not found".to_string()));
    }

    info!(log_id, "Mood log deleted");

    Ok(StatusCode::NO_CONTENT)
}
