//! Friendship endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::friendship::{CreateFriendshipRequest, UpdateFriendshipRequest};
use domain::models::Friendship;
use persistence::repositories::{FriendshipRepository, UserRepository};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;

/// Send a friend request; starts out pending.
///
/// POST /api/v1/friends
pub async fn create_friendship(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateFriendshipRequest>,
) -> Result<(StatusCode, Json<Friendship>), ApiError> {
    if request.requester_id == request.addressee_id {
        return Err(ApiError::field(
            "addresseeId",
            "Cannot send a friend request to yourself",
        ));
    }

    let user_repo = UserRepository::new(state.pool.clone());
    let (requester_exists, addressee_exists) = tokio::try_join!(
        user_repo.exists(request.requester_id),
        user_repo.exists(request.addressee_id),
    )?;
    if !requester_exists || !addressee_exists {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let repo = FriendshipRepository::new(state.pool.clone());
    if repo
        .find_between(request.requester_id, request.addressee_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "A friendship between these users already exists".to_string(),
        ));
    }

    let friendship: Friendship = repo
        .create(request.requester_id, request.addressee_id)
        .await?
        .into();

    info!(
        friendship_id = friendship.id,
        requester_id = friendship.requester_id,
        addressee_id = friendship.addressee_id,
        "Friend request created"
    );

    Ok((StatusCode::CREATED, Json(friendship)))
}

/// Friendships in either direction, any status.
///
/// GET /api/v1/friends/user/:user_id
pub async fn list_user_friendships(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Friendship>>, ApiError> {
    let repo = FriendshipRepository::new(state.pool.clone());
    let friendships = repo.find_by_user(user_id).await?;
    Ok(Json(friendships.into_iter().map(Friendship::from).collect()))
}

/// PATCH /api/v1/friends/:friendship_id
pub async fn update_friendship(
    State(state): State<AppState>,
    Path(friendship_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateFriendshipRequest>,
) -> Result<Json<Friendship>, ApiError> {
    let repo = FriendshipRepository::new(state.pool.clone());
    let friendship: Friendship = repo
        .update_status(friendship_id, request.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Friendship not found".to_string()))?
        .into();

    info!(
        friendship_id = friendship.id,
        status = %friendship.status,
        "Friendship updated"
    );

    Ok(Json(friendship))
}

/// DELETE /api/v1/friends/:friendship_id
pub async fn delete_friendship(
    State(state): State<AppState>,
    Path(friendship_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = FriendshipRepository::new(state.pool.clone());
    if repo.delete(friendship_id).await? == 0 {
        return Err(ApiError::NotFound("Friendship not found".to_string()));
    }

    info!(friendship_id, "Friendship deleted");

    Ok(StatusCode::NO_CONTENT)
}
