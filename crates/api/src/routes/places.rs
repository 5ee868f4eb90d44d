//! Place endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::place::{CreatePlaceRequest, UpdatePlaceRequest};
use domain::models::{NearbyPlace, Place, PlaceCategory};
use persistence::repositories::PlaceRepository;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiQuery, ValidatedJson};
use crate::routes::LocationQuery;

/// POST /api/v1/places
pub async fn create_place(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreatePlaceRequest>,
) -> Result<(StatusCode, Json<Place>), ApiError> {
    let repo = PlaceRepository::new(state.pool.clone());
    let place: Place = repo
        .create(
            request.name.trim(),
            request.category,
            request.latitude,
            request.longitude,
            request.geofence_radius,
        )
        .await?
        .into();

    info!(
        place_id = place.id,
        category = %place.category,
        radius_m = place.geofence_radius,
        "Place created"
    );

    Ok((StatusCode::CREATED, Json(place)))
}

/// GET /api/v1/places
pub async fn list_places(State(state): State<AppState>) -> Result<Json<Vec<Place>>, ApiError> {
    let repo = PlaceRepository::new(state.pool.clone());
    let places = repo.find_all().await?.into_iter().map(Place::from).collect();
    Ok(Json(places))
}

/// GET /api/v1/places/:place_id
pub async fn get_place(
    State(state): State<AppState>,
    Path(place_id): Path<i64>,
) -> Result<Json<Place>, ApiError> {
    let repo = PlaceRepository::new(state.pool.clone());
    let place = repo
        .find_by_id(place_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))?;

    Ok(Json(place.into()))
}

/// PATCH /api/v1/places/:place_id
pub async fn update_place(
    State(state): State<AppState>,
    Path(place_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdatePlaceRequest>,
) -> Result<Json<Place>, ApiError> {
    let repo = PlaceRepository::new(state.pool.clone());
    let place: Place = repo
        .update(
            place_id,
            request.name.as_deref().map(str::trim),
            request.category,
            request.latitude,
            request.longitude,
            request.geofence_radius,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))?
        .into();

    info!(place_id = place.id, "Place updated");

    Ok(Json(place))
}

/// DELETE /api/v1/places/:place_id
pub async fn delete_place(
    State(state): State<AppState>,
    Path(place_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = PlaceRepository::new(state.pool.clone());
    if repo.delete(place_id).await? == 0 {
        return Err(ApiError::NotFound("Place not found".to_string()));
    }

    info!(place_id, "Place deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/places/category/:category
pub async fn list_places_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Place>>, ApiError> {
    let category: PlaceCategory = category
        .parse()
        .map_err(|message: String| ApiError::field("category", message))?;

    let repo = PlaceRepository::new(state.pool.clone());
    let places = repo
        .find_by_category(category)
        .await?
        .into_iter()
        .map(Place::from)
        .collect();
    Ok(Json(places))
}

/// Places within the radius, closest first.
///
/// GET /api/v1/places/nearby?latitude=&longitude=&radiusKm=
pub async fn nearby_places(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LocationQuery>,
) -> Result<Json<Vec<NearbyPlace>>, ApiError> {
    let position = query.position()?;
    let radius_km = query.radius_km(state.config.triggers.default_nearby_radius_km)?;

    let places = state
        .proximity
        .nearby_by_distance(position.latitude, position.longitude, radius_km)
        .await?;
    Ok(Json(places))
}
