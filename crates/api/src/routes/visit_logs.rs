//! Visit log endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::visit_log::{CreateVisitLogRequest, UpdateVisitLogRequest};
use domain::models::VisitLog;
use persistence::repositories::{PlaceRepository, UserRepository, VisitLogRepository};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiQuery, ValidatedJson};
use crate::routes::RangeQuery;

/// POST /api/v1/visit-logs
pub async fn create_visit_log(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateVisitLogRequest>,
) -> Result<(StatusCode, Json<VisitLog>), ApiError> {
    request.check_time_order()?;

    let user_repo = UserRepository::new(state.pool.clone());
    if !user_repo.exists(request.user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let place_repo = PlaceRepository::new(state.pool.clone());
    if place_repo.find_by_id(request.place_id).await?.is_none() {
        return Err(ApiError::NotFound("Place not found".to_string()));
    }

    let repo = VisitLogRepository::new(state.pool.clone());
    let visit: VisitLog = repo
        .create(
            request.user_id,
            request.place_id,
            request.entry_time,
            request.exit_time,
            request.duration_mins,
        )
        .await?
        .into();

    info!(
        log_id = visit.id,
        user_id = visit.user_id,
        place_id = visit.place_id,
        "Visit log created"
    );

    Ok((StatusCode::CREATED, Json(visit)))
}

/// GET /api/v1/visit-logs/:log_id
pub async fn get_visit_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<Json<VisitLog>, ApiError> {
    let repo = VisitLogRepository::new(state.pool.clone());
    let visit = repo
        .find_by_id(log_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Visit log not found".to_string()))?;

    Ok(Json(visit.into()))
}

/// GET /api/v1/visit-logs/user/:user_id
pub async fn list_user_visit_logs(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<VisitLog>>, ApiError> {
    let repo = VisitLogRepository::new(state.pool.clone());
    let visits = repo.find_by_user(user_id).await?;
    Ok(Json(visits.into_iter().map(VisitLog::from).collect()))
}

/// GET /api/v1/visit-logs/user/:user_id/range?start=&end=
pub async fn list_user_visit_logs_in_range(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ApiQuery(range): ApiQuery<RangeQuery>,
) -> Result<Json<Vec<VisitLog>>, ApiError> {
    let (start, end) = range.checked()?;
    let repo = VisitLogRepository::new(state.pool.clone());
    let visits = repo.find_by_user_between(user_id, start, end).await?;
    Ok(Json(visits.into_iter().map(VisitLog::from).collect()))
}

/// GET /api/v1/visit-logs/place/:place_id
pub async fn list_place_visit_logs(
    State(state): State<AppState>,
    Path(place_id): Path<i64>,
) -> Result<Json<Vec<VisitLog>>, ApiError> {
    let repo = VisitLogRepository::new(state.pool.clone());
    let visits = repo.find_by_place(place_id).await?;
    Ok(Json(visits.into_iter().map(VisitLog::from).collect()))
}

/// Partial update; the duration follows the merged entry and exit times.
///
/// PATCH /api/v1/visit-logs/:log_id
pub async fn update_visit_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateVisitLogRequest>,
) -> Result<Json<VisitLog>, ApiError> {
    let repo = VisitLogRepository::new(state.pool.clone());
    let existing: VisitLog = repo
        .find_by_id(log_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Visit log not found".to_string()))?
        .into();

    let merged = request.apply(&existing)?;
    let visit: VisitLog = repo
        .update(&merged)
        .await?
        .ok_or_else(|| ApiError::NotFound("Visit log not found".to_string()))?
        .into();

    info!(log_id, duration_mins = visit.duration_mins, "Visit log updated");

    Ok(Json(visit))
}

/// DELETE /api/v1/visit-logs/:log_id
pub async fn delete_visit_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = VisitLogRepository::new(state.pool.clone());
    if repo.delete(log_id).await? == 0 {
        return Err(ApiError::NotFound("Visit log not found".to_string()));
    }

    info!(log_id, "Visit log deleted");

    Ok(StatusCode::NO_CONTENT)
}
