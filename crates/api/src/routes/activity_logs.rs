//! Activity log endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::activity_log::{
    normalize_activity_type, BulkCreateActivityLogsRequest, CreateActivityLogRequest,
    UpdateActivityLogRequest,
};
use domain::models::ActivityLog;
use persistence::repositories::{ActivityLogRepository, NewActivityLog, UserRepository};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiQuery, ValidatedJson};
use crate::routes::RangeQuery;

/// An activity counts as current if it started within this window.
const CURRENT_ACTIVITY_WINDOW_MS: i64 = 10 * 60 * 1000;

/// POST /api/v1/activity-logs
pub async fn create_activity_log(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateActivityLogRequest>,
) -> Result<(StatusCode, Json<ActivityLog>), ApiError> {
    request.check_time_order()?;

    let user_repo = UserRepository::new(state.pool.clone());
    if !user_repo.exists(request.user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let repo = ActivityLogRepository::new(state.pool.clone());
    let activity: ActivityLog = repo
        .create(
            request.user_id,
            &request.normalized_type(),
            request.start_time,
            request.end_time,
            request.confidence,
        )
        .await?
        .into();

    info!(
        log_id = activity.id,
        user_id = activity.user_id,
        activity_type = %activity.activity_type,
        "Activity log created"
    );

    Ok((StatusCode::CREATED, Json(activity)))
}

/// Batch upload; every activity is stored or none is.
///
/// POST /api/v1/activity-logs/bulk
pub async fn bulk_create_activity_logs(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BulkCreateActivityLogsRequest>,
) -> Result<(StatusCode, Json<Vec<ActivityLog>>), ApiError> {
    request.check_time_order()?;

    let user_ids = request.user_ids();
    let user_repo = UserRepository::new(state.pool.clone());
    if user_repo.count_existing(&user_ids).await? != user_ids.len() as i64 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let batch: Vec<NewActivityLog> = request
        .activities
        .iter()
        .map(|a| NewActivityLog {
            user_id: a.user_id,
            activity_type: a.normalized_type(),
            start_time: a.start_time,
            end_time: a.end_time,
            confidence: a.confidence,
        })
        .collect();

    let repo = ActivityLogRepository::new(state.pool.clone());
    let created = repo.create_many(&batch).await?;

    info!(
        count = created.len(),
        users = user_ids.len(),
        "Activity logs uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(created.into_iter().map(ActivityLog::from).collect()),
    ))
}

/// GET /api/v1/activity-logs/:log_id
pub async fn get_activity_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<Json<ActivityLog>, ApiError> {
    let repo = ActivityLogRepository::new(state.pool.clone());
    let activity = repo
        .find_by_id(log_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity log not found".to_string()))?;

    Ok(Json(activity.into()))
}

/// GET /api/v1/activity-logs/user/:user_id
pub async fn list_user_activity_logs(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    let repo = ActivityLogRepository::new(state.pool.clone());
    let logs = repo.find_by_user(user_id).await?;
    Ok(Json(logs.into_iter().map(ActivityLog::from).collect()))
}

/// GET /api/v1/activity-logs/user/:user_id/range?start=&end=
pub async fn list_user_activity_logs_in_range(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ApiQuery(range): ApiQuery<RangeQuery>,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    let (start, end) = range.checked()?;
    let repo = ActivityLogRepository::new(state.pool.clone());
    let logs = repo.find_by_user_between(user_id, start, end).await?;
    Ok(Json(logs.into_iter().map(ActivityLog::from).collect()))
}

/// The type segment is matched case-insensitively.
///
/// GET /api/v1/activity-logs/user/:user_id/type/:activity_type
pub async fn list_user_activity_logs_by_type(
    State(state): State<AppState>,
    Path((user_id, activity_type)): Path<(i64, String)>,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    let repo = ActivityLogRepository::new(state.pool.clone());
    let logs = repo
        .find_by_user_and_type(user_id, &normalize_activity_type(&activity_type))
        .await?;
    Ok(Json(logs.into_iter().map(ActivityLog::from).collect()))
}

/// Most recent activity started in the last ten minutes, or `null`.
///
/// GET /api/v1/activity-logs/user/:user_id/current
pub async fn get_current_activity(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Option<ActivityLog>>, ApiError> {
    let since = Utc::now().timestamp_millis() - CURRENT_ACTIVITY_WINDOW_MS;
    let repo = ActivityLogRepository::new(state.pool.clone());
    let current = repo.find_current(user_id, since).await?;
    Ok(Json(current.map(ActivityLog::from)))
}

/// Partial update; the merged interval must still be ordered.
///
/// PATCH /api/v1/activity-logs/:log_id
pub async fn update_activity_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateActivityLogRequest>,
) -> Result<Json<ActivityLog>, ApiError> {
    let repo = ActivityLogRepository::new(state.pool.clone());
    let existing: ActivityLog = repo
        .find_by_id(log_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity log not found".to_string()))?
        .into();

    let merged = request.apply(&existing)?;
    let activity: ActivityLog = repo
        .update(&merged)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity log not found".to_string()))?
        .into();

    info!(log_id, activity_type = %activity.activity_type, "Activity log updated");

    Ok(Json(activity))
}

/// DELETE /api/v1/activity-logs/:log_id
pub async fn delete_activity_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = ActivityLogRepository::new(state.pool.clone());
    if repo.delete(log_id).await? == 0 {
        return Err(ApiError::NotFound("Activity log not found".to_string()));
    }

    info!(log_id, "Activity log deleted");

    Ok(StatusCode::NO_CONTENT)
}
