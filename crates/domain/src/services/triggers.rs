//! Geofence trigger engine.
//!
//! Turns a reported position into an ordered list of logging prompts for
//! the places the user is currently inside.

use std::sync::Arc;

use chrono::Utc;
use shared::geo::{self, Region};
use tracing::{debug, info};

use crate::error::DomainError;
use crate::models::trigger::{sort_triggers, NotificationHistoryEntry};
use crate::models::{Place, Position, Trigger};
use crate::services::proximity::PlaceProximityIndex;
use crate::services::suppression::{RecencySuppression, DEFAULT_LOCATION_TOLERANCE_DEG};
use crate::stores::{Stores, UserStore, VisitLogStore};

/// Tunables for trigger evaluation.
#[derive(Debug, Clone)]
pub struct TriggerSettings {
    /// Coarse candidate radius around the user.
    pub prefilter_radius_km: f64,
    /// Lookback for both the visit check and the category check.
    pub suppression_window_mins: i64,
    pub location_tolerance_deg: f64,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            prefilter_radius_km: 1.0,
            suppression_window_mins: 30,
            location_tolerance_deg: DEFAULT_LOCATION_TOLERANCE_DEG,
        }
    }
}

pub struct TriggerEngine {
    users: Arc<dyn UserStore>,
    visit_logs: Arc<dyn VisitLogStore>,
    proximity: PlaceProximityIndex,
    suppression: RecencySuppression,
    region: Region,
    settings: TriggerSettings,
}

impl TriggerEngine {
    pub fn new(stores: &Stores, region: Region, settings: TriggerSettings) -> Self {
        Self {
            users: stores.users.clone(),
            visit_logs: stores.visit_logs.clone(),
            proximity: PlaceProximityIndex::new(stores.places.clone()),
            suppression: RecencySuppression::new(stores, settings.location_tolerance_deg),
            region,
            settings,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Evaluates triggers for the user at `position`, as of now.
    pub async fn check_triggers(
        &self,
        user_id: i64,
        position: Position,
    ) -> Result<Vec<Trigger>, DomainError> {
        self.check_triggers_at(user_id, position, Utc::now().timestamp_millis())
            .await
    }

    /// Evaluates triggers as of `now_ms` (epoch milliseconds).
    pub async fn check_triggers_at(
        &self,
        user_id: i64,
        position: Position,
        now_ms: i64,
    ) -> Result<Vec<Trigger>, DomainError> {
        let Position {
            latitude,
            longitude,
        } = position;

        check_coordinates(latitude, longitude)?;

        if !self.region.contains(latitude, longitude) {
            return Err(DomainError::OutOfRegion {
                region: self.region.name.clone(),
                latitude,
                longitude,
            });
        }

        if !self.users.exists(user_id).await? {
            return Err(DomainError::NotFound("User".to_string()));
        }

        metrics::counter!("location_checks_total").increment(1);

        let candidates = self
            .proximity
            .nearby(latitude, longitude, self.settings.prefilter_radius_km)
            .await?;
        let candidate_count = candidates.len();

        let since = now_ms - self.settings.suppression_window_mins * 60_000;
        let mut triggers = Vec::new();

        for place in candidates {
            let distance = geo::distance_meters(latitude, longitude, place.latitude, place.longitude);
            if distance > i64::from(place.geofence_radius) {
                continue;
            }

            if self.is_suppressed(user_id, &place, since).await? {
                continue;
            }

            triggers.push(Trigger::for_place(&place, distance));
        }

        sort_triggers(&mut triggers);

        for trigger in &triggers {
            metrics::counter!("triggers_emitted_total", "priority" => trigger.priority.as_str())
                .increment(1);
        }

        info!(
            user_id,
            latitude,
            longitude,
            candidates = candidate_count,
            emitted = triggers.len(),
            "Location triggers evaluated"
        );

        Ok(triggers)
    }

    async fn is_suppressed(
        &self,
        user_id: i64,
        place: &Place,
        since: i64,
    ) -> Result<bool, DomainError> {
        let (visited, logged) = tokio::try_join!(
            self.suppression.has_recent_visit(user_id, place.id, since),
            self.suppression.has_recent_log(
                user_id,
                place.category,
                place.latitude,
                place.longitude,
                since
            ),
        )?;

        if visited || logged {
            debug!(user_id, place_id = place.id, visited, logged, "Trigger suppressed");
        }
        Ok(visited || logged)
    }

    /// Recent visits, newest first, shown as past notifications.
    pub async fn notification_history(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<NotificationHistoryEntry>, DomainError> {
        if limit < 1 {
            return Err(DomainError::validation("limit", "Limit must be positive"));
        }
        if !self.users.exists(user_id).await? {
            return Err(DomainError::NotFound("User".to_string()));
        }

        let visits = self.visit_logs.find_latest_with_place(user_id, limit).await?;
        Ok(visits
            .into_iter()
            .map(|v| NotificationHistoryEntry {
                place_id: v.visit.place_id,
                place_name: v.place_name,
                category: v.place_category,
                timestamp: v.visit.entry_time,
                was_logged: true,
            })
            .collect())
    }
}

fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), DomainError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(DomainError::validation(
            "latitude",
            "Latitude must be between -90 and 90",
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(DomainError::validation(
            "longitude",
            "Longitude must be between -180 and 180",
        ));
    }
    Ok(())
}
