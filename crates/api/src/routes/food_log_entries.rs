//! Handlers for individual food lines of a logged meal.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::food_log::{CreateFoodLogEntryRequest, UpdateFoodLogEntryRequest};
use domain::models::FoodLogEntry;
use persistence::repositories::{FoodLogRepository, FoodRepository, NewFoodLogItem};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;

fn entry_not_found() -> ApiError {
    ApiError::NotFound("Food log entry not found".to_string())
}

/// Add a food to an existing meal.
///
/// POST /api/v1/food-in-logs
pub async fn create_entry(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateFoodLogEntryRequest>,
) -> Result<(StatusCode, Json<FoodLogEntry>), ApiError> {
    let repo = FoodLogRepository::new(state.pool.clone());
    if !repo.exists(request.log_id).await? {
        return Err(ApiError::NotFound("Food log not found".to_string()));
    }

    let food_repo = FoodRepository::new(state.pool.clone());
    if food_repo.find_by_id(request.food_id).await?.is_none() {
        return Err(ApiError::NotFound("Food not found".to_string()));
    }

    let entry: FoodLogEntry = repo
        .add_item(
            request.log_id,
            NewFoodLogItem {
                food_id: request.food_id,
                quantity: request.quantity,
                calories: request.calories,
            },
        )
        .await?
        .into();

    info!(
        entry_id = entry.item.id,
        log_id = entry.log_id,
        food_id = entry.item.food_id,
        "Food log entry created"
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/food-in-logs/:entry_id
pub async fn get_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> Result<Json<FoodLogEntry>, ApiError> {
    let repo = FoodLogRepository::new(state.pool.clone());
    let entry = repo.find_item(entry_id).await?.ok_or_else(entry_not_found)?;
    Ok(Json(entry.into()))
}

/// GET /api/v1/food-in-logs/log/:log_id
pub async fn list_log_entries(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<Json<Vec<FoodLogEntry>>, ApiError> {
    let repo = FoodLogRepository::new(state.pool.clone());
    if !repo.exists(log_id).await? {
        return Err(ApiError::NotFound("Food log not found".to_string()));
    }

    let entries = repo.find_items_by_log(log_id).await?;
    Ok(Json(entries.into_iter().map(FoodLogEntry::from).collect()))
}

/// PATCH /api/v1/food-in-logs/:entry_id
pub async fn update_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateFoodLogEntryRequest>,
) -> Result<Json<FoodLogEntry>, ApiError> {
    let repo = FoodLogRepository::new(state.pool.clone());
    let entry: FoodLogEntry = repo
        .update_item(entry_id, request.quantity, request.calories)
        .await?
        .ok_or_else(entry_not_found)?
        .into();

    info!(entry_id, log_id = entry.log_id, "Food log entry updated");

    Ok(Json(entry))
}

/// The owning meal is kept even when its last line goes.
///
/// DELETE /api/v1/food-in-logs/:entry_id
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = FoodLogRepository::new(state.pool.clone());
    if repo.delete_item(entry_id).await? == 0 {
        return Err(entry_not_found());
    }

    info!(entry_id, "Food log entry deleted");

    Ok(StatusCode::NO_CONTENT)
}
