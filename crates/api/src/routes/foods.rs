//! Food catalogue endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::food::CreateFoodRequest;
use domain::models::Food;
use persistence::repositories::FoodRepository;
use serde::Deserialize;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiQuery, ValidatedJson};

/// Query parameters for food search.
#[derive(Debug, Deserialize)]
pub struct SearchFoodsQuery {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
}

/// POST /api/v1/foods
pub async fn create_food(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateFoodRequest>,
) -> Result<(StatusCode, Json<Food>), ApiError> {
    let repo = FoodRepository::new(state.pool.clone());
    let name = request.name.trim();

    if repo.name_exists(name).await? {
        return Err(ApiError::Conflict(format!("Food '{}' already exists", name)));
    }

    let food: Food = repo.create(name, request.calories).await?.into();

    info!(food_id = food.id, "Food created");

    Ok((StatusCode::CREATED, Json(food)))
}

/// GET /api/v1/foods/:food_id
pub async fn get_food(
    State(state): State<AppState>,
    Path(food_id): Path<i64>,
) -> Result<Json<Food>, ApiError> {
    let repo = FoodRepository::new(state.pool.clone());
    let food = repo
        .find_by_id(food_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food not found".to_string()))?;

    Ok(Json(food.into()))
}

/// GET /api/v1/foods?name=
pub async fn search_foods(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchFoodsQuery>,
) -> Result<Json<Vec<Food>>, ApiError> {
    let repo = FoodRepository::new(state.pool.clone());
    let term = query.name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let foods = repo.search(term).await?.into_iter().map(Food::from).collect();
    Ok(Json(foods))
}
