//! Recency suppression.
//!
//! Decides whether the user already logged the activity a place would
//! prompt for, so the prompt is not repeated.

use std::sync::Arc;

use shared::geo::BoundingBox;
use tracing::debug;

use crate::error::DomainError;
use crate::models::PlaceCategory;
use crate::stores::{ActivityLogStore, EmaLogStore, FoodLogStore, Stores, VisitLogStore};

/// Default half-width of the location match box, in degrees (~200 m).
pub const DEFAULT_LOCATION_TOLERANCE_DEG: f64 = 0.002;

pub struct RecencySuppression {
    food_logs: Arc<dyn FoodLogStore>,
    activity_logs: Arc<dyn ActivityLogStore>,
    ema_logs: Arc<dyn EmaLogStore>,
    visit_logs: Arc<dyn VisitLogStore>,
    location_tolerance_deg: f64,
}

impl RecencySuppression {
    pub fn new(stores: &Stores, location_tolerance_deg: f64) -> Self {
        Self {
            food_logs: stores.food_logs.clone(),
            activity_logs: stores.activity_logs.clone(),
            ema_logs: stores.ema_logs.clone(),
            visit_logs: stores.visit_logs.clone(),
            location_tolerance_deg,
        }
    }

    /// Whether the user logged the category's activity since `since`.
    ///
    /// Restaurants and parks match logs positioned within the tolerance box
    /// around the place. Gyms match any workout regardless of position.
    /// Stores and other places never suppress.
    pub async fn has_recent_log(
        &self,
        user_id: i64,
        category: PlaceCategory,
        latitude: f64,
        longitude: f64,
        since: i64,
    ) -> Result<bool, DomainError> {
        let area = BoundingBox::around(latitude, longitude, self.location_tolerance_deg);

        let found = match category {
            PlaceCategory::Restaurant => !self
                .food_logs
                .find_recent(user_id, since, Some(area))
                .await?
                .is_empty(),
            PlaceCategory::Gym => self
                .activity_logs
                .find_recent(user_id, since)
                .await?
                .iter()
                .any(|a| a.is_workout()),
            PlaceCategory::Park => !self
                .ema_logs
                .find_recent(user_id, since, Some(area))
                .await?
                .is_empty(),
            PlaceCategory::Store | PlaceCategory::Other => false,
        };

        debug!(user_id, category = %category, since, found, "Recent log check");
        Ok(found)
    }

    /// Whether the user entered the place since `since`.
    pub async fn has_recent_visit(
        &self,
        user_id: i64,
        place_id: i64,
        since: i64,
    ) -> Result<bool, DomainError> {
        let found = !self
            .visit_logs
            .find_recent(user_id, Some(place_id), since)
            .await?
            .is_empty();

        debug!(user_id, place_id, since, found, "Recent visit check");
        Ok(found)
    }
}
