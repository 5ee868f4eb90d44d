//! Geofence notification endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use domain::models::trigger::{NotificationHistoryEntry, TriggerCheckResponse};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiQuery;
use crate::routes::LocationQuery;

const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Query parameters for notification history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Prompts for the places the user is currently inside, most urgent first.
///
/// GET /api/v1/notifications/:user_id/triggers?latitude=&longitude=
pub async fn check_triggers(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ApiQuery(query): ApiQuery<LocationQuery>,
) -> Result<Json<TriggerCheckResponse>, ApiError> {
    let position = query.position()?;
    let now_ms = Utc::now().timestamp_millis();

    let triggers = state
        .engine
        .check_triggers_at(user_id, position, now_ms)
        .await?;

    Ok(Json(TriggerCheckResponse::new(triggers, position, now_ms)))
}

/// GET /api/v1/notifications/:user_id/history?limit=
pub async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<Vec<NotificationHistoryEntry>>, ApiError> {
    let max = state.config.limits.max_history_limit;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if limit < 1 || limit > max {
        return Err(ApiError::field(
            "limit",
            format!("limit must be between 1 and {}", max),
        ));
    }

    Ok(Json(state.engine.notification_history(user_id, limit).await?))
}
