//! Food log endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::food_log::{CreateFoodLogRequest, FoodLogResponse, UpdateFoodLogRequest};
use persistence::repositories::{FoodLogRepository, FoodRepository, NewFoodLogItem, UserRepository};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiQuery, ValidatedJson};
use crate::routes::RangeQuery;

/// Log a meal with one or more foods.
///
/// POST /api/v1/food-logs
pub async fn create_food_log(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateFoodLogRequest>,
) -> Result<(StatusCode, Json<FoodLogResponse>), ApiError> {
    let user_repo = UserRepository::new(state.pool.clone());
    if !user_repo.exists(request.user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let mut food_ids: Vec<i64> = request.items.iter().map(|i| i.food_id).collect();
    food_ids.sort_unstable();
    food_ids.dedup();

    let food_repo = FoodRepository::new(state.pool.clone());
    if food_repo.count_existing(&food_ids).await? != food_ids.len() as i64 {
        return Err(ApiError::NotFound("Food not found".to_string()));
    }

    let items: Vec<NewFoodLogItem> = request
        .items
        .iter()
        .map(|i| NewFoodLogItem {
            food_id: i.food_id,
            quantity: i.quantity,
            calories: i.calories,
        })
        .collect();

    let repo = FoodLogRepository::new(state.pool.clone());
    let log = repo
        .create(
            request.user_id,
            request.timestamp,
            request.latitude,
            request.longitude,
            &items,
        )
        .await?;

    info!(
        log_id = log.id,
        user_id = log.user_id,
        items = log.items.len(),
        "Food log created"
    );

    Ok((StatusCode::CREATED, Json(log.into())))
}

/// GET /api/v1/food-logs/:log_id
pub async fn get_food_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<Json<FoodLogResponse>, ApiError> {
    let repo = FoodLogRepository::new(state.pool.clone());
    let log = repo
        .find_by_id(log_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food log not found".to_string()))?;

    Ok(Json(log.into()))
}

/// Newest first.
///
/// GET /api/v1/food-logs/user/:user_id
pub async fn list_user_food_logs(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<FoodLogResponse>>, ApiError> {
    let repo = FoodLogRepository::new(state.pool.clone());
    let logs = repo.find_by_user(user_id).await?;
    Ok(Json(logs.into_iter().map(FoodLogResponse::from).collect()))
}

/// GET /api/v1/food-logs/user/:user_id/range?start=&end=
pub async fn list_user_food_logs_in_range(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ApiQuery(range): ApiQuery<RangeQuery>,
) -> Result<Json<Vec<FoodLogResponse>>, ApiError> {
    let (start, end) = range.checked()?;
    let repo = FoodLogRepository::new(state.pool.clone());
    let logs = repo.find_by_user_between(user_id, start, end).await?;
    Ok(Json(logs.into_iter().map(FoodLogResponse::from).collect()))
}

/// Re-time or move a meal. Lines are edited under `/food-in-logs`.
///
/// PATCH /api/v1/food-logs/:log_id
pub async fn update_food_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateFoodLogRequest>,
) -> Result<Json<FoodLogResponse>, ApiError> {
    let repo = FoodLogRepository::new(state.pool.clone());
    let log = repo
        .update(log_id, request.timestamp, request.latitude, request.longitude)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food log not found".to_string()))?;

    info!(log_id, user_id = log.user_id, "Food log updated");

    Ok(Json(log.into()))
}

/// DELETE /api/v1/food-logs/:log_id
pub async fn delete_food_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = FoodLogRepository::new(state.pool.clone());
    if repo.delete(log_id).await? == 0 {
        return Err(ApiError::NotFound("Food log not found".to_string()));
    }

    info!(log_id, "Food log deleted");

    Ok(StatusCode::NO_CONTENT)
}
