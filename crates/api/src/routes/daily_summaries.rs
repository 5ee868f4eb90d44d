//! Daily summary endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::daily_summary::{
    parse_summary_date, CreateDailySummaryRequest, UpdateDailySummaryRequest,
};
use domain::models::DailySummary;
use persistence::repositories::{DailySummaryRepository, UserRepository};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;

fn summary_not_found() -> ApiError {
    ApiError::NotFound("Daily summary not found".to_string())
}

/// POST /api/v1/daily-summaries
pub async fn create_daily_summary(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateDailySummaryRequest>,
) -> Result<(StatusCode, Json<DailySummary>), ApiError> {
    let user_repo = UserRepository::new(state.pool.clone());
    if !user_repo.exists(request.user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let repo = DailySummaryRepository::new(state.pool.clone());
    let summary: DailySummary = repo
        .create(request.user_id, request.date, request.total_calories_in)
        .await?
        .into();

    info!(
        summary_id = summary.id,
        user_id = summary.user_id,
        date = %summary.date,
        "Daily summary created"
    );

    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/v1/daily-summaries/:summary_id
pub async fn get_daily_summary(
    State(state): State<AppState>,
    Path(summary_id): Path<i64>,
) -> Result<Json<DailySummary>, ApiError> {
    let repo = DailySummaryRepository::new(state.pool.clone());
    let summary = repo
        .find_by_id(summary_id)
        .await?
        .ok_or_else(summary_not_found)?;

    Ok(Json(summary.into()))
}

/// Latest date first.
///
/// GET /api/v1/daily-summaries/user/:user_id
pub async fn list_user_daily_summaries(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<DailySummary>>, ApiError> {
    let repo = DailySummaryRepository::new(state.pool.clone());
    let summaries = repo.find_by_user(user_id).await?;
    Ok(Json(summaries.into_iter().map(DailySummary::from).collect()))
}

/// The summary recorded for one local day, or `null` when none was.
///
/// GET /api/v1/daily-summaries/user/:user_id/date/:date
pub async fn get_user_daily_summary_for_date(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(i64, String)>,
) -> Result<Json<Option<DailySummary>>, ApiError> {
    let date = parse_summary_date(&date)
        .ok_or_else(|| ApiError::field("date", "date must be formatted YYYY-MM-DD"))?;

    let user_repo = UserRepository::new(state.pool.clone());
    if !user_repo.exists(user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let repo = DailySummaryRepository::new(state.pool.clone());
    let summary = repo.find_by_user_and_date(user_id, date).await?;
    Ok(Json(summary.map(DailySummary::from)))
}

/// PATCH /api/v1/daily-summaries/:summary_id
pub async fn update_daily_summary(
    State(state): State<AppState>,
    Path(summary_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateDailySummaryRequest>,
) -> Result<Json<DailySummary>, ApiError> {
    let repo = DailySummaryRepository::new(state.pool.clone());
    let summary: DailySummary = repo
        .update(summary_id, request.date, request.total_calories_in)
        .await?
        .ok_or_else(summary_not_found)?
        .into();

    info!(summary_id, "Daily summary updated");

    Ok(Json(summary))
}

/// DELETE /api/v1/daily-summaries/:summary_id
pub async fn delete_daily_summary(
    State(state): State<AppState>,
    Path(summary_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = DailySummaryRepository::new(state.pool.clone());
    if repo.delete(summary_id).await? == 0 {
        return Err(summary_not_found());
    }

    info!(summary_id, "Daily summary deleted");

    Ok(StatusCode::NO_CONTENT)
}
