//! Location trigger models.
//!
//! A trigger is a derived, per-request recommendation to prompt the user
//! to log something at a nearby place. Triggers are never persisted.

use serde::{Deserialize, Serialize};

use super::place::{Place, PlaceCategory};

/// Distance under which a trigger is HIGH priority and vibrates.
pub const CLOSE_RANGE_METERS: i64 = 50;

/// Distance under which high-interest categories are MEDIUM priority.
pub const MEDIUM_RANGE_METERS: i64 = 200;

/// A latitude/longitude pair supplied by the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Kind of log a trigger prompts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    FoodLog,
    ActivityLog,
    EmaLog,
    VisitLog,
}

/// Trigger priority. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriggerPriority {
    High,
    Medium,
    Low,
}

impl TriggerPriority {
    /// Priority for a place of `category` at `distance_meters`.
    pub fn classify(category: PlaceCategory, distance_meters: i64) -> Self {
        if distance_meters < CLOSE_RANGE_METERS {
            TriggerPriority::High
        } else if distance_meters < MEDIUM_RANGE_METERS && category.is_high_interest() {
            TriggerPriority::Medium
        } else {
            TriggerPriority::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerPriority::High => "HIGH",
            TriggerPriority::Medium => "MEDIUM",
            TriggerPriority::Low => "LOW",
        }
    }
}

/// A prompt to log an activity at a nearby place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub place_id: i64,
    pub place_name: String,
    pub category: PlaceCategory,
    pub notification_type: NotificationType,
    pub message: String,
    pub priority: TriggerPriority,
    /// Distance to the place in whole meters.
    pub distance: i64,
    pub should_vibrate: bool,
    pub icon: String,
}

impl Trigger {
    /// Builds the trigger for `place` observed at `distance_meters`.
    pub fn for_place(place: &Place, distance_meters: i64) -> Self {
        Self {
            place_id: place.id,
            place_name: place.name.clone(),
            category: place.category,
            notification_type: place.category.notification_type(),
            message: place.category.prompt_message(&place.name),
            priority: TriggerPriority::classify(place.category, distance_meters),
            distance: distance_meters,
            should_vibrate: distance_meters < CLOSE_RANGE_METERS,
            icon: place.category.icon().to_string(),
        }
    }
}

/// Orders triggers by priority (HIGH first), then by distance ascending.
pub fn sort_triggers(triggers: &mut [Trigger]) {
    triggers.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.distance.cmp(&b.distance))
    });
}

/// Response payload for a location check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCheckResponse {
    pub triggers: Vec<Trigger>,
    pub metadata: TriggerCheckMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCheckMetadata {
    pub count: usize,
    pub should_notify: bool,
    pub user_location: Position,
    /// Evaluation time, epoch milliseconds.
    pub timestamp: i64,
}

impl TriggerCheckResponse {
    pub fn new(triggers: Vec<Trigger>, user_location: Position, timestamp: i64) -> Self {
        let count = triggers.len();
        Self {
            triggers,
            metadata: TriggerCheckMetadata {
                count,
                should_notify: count > 0,
                user_location,
                timestamp,
            },
        }
    }
}

/// A past visit, shown as notification history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationHistoryEntry {
    pub place_id: i64,
    pub place_name: String,
    pub category: PlaceCategory,
    pub timestamp: i64,
    pub was_logged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn place(category: PlaceCategory) -> Place {
        Place {
            id: 1,
            name: "Warung Bu Rudy".to_string(),
            category,
            latitude: -7.2644,
            longitude: 112.7378,
            geofence_radius: 300,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_priority_close_range_is_high_for_every_category() {
        for category in PlaceCategory::ALL {
            assert_eq!(TriggerPriority::classify(category, 0), TriggerPriority::High);
            assert_eq!(TriggerPriority::classify(category, 49), TriggerPriority::High);
        }
    }

    #[test]
    fn test_priority_medium_range_depends_on_category() {
        assert_eq!(
            TriggerPriority::classify(PlaceCategory::Restaurant, 50),
            TriggerPriority::Medium
        );
        assert_eq!(
            TriggerPriority::classify(PlaceCategory::Park, 199),
            TriggerPriority::Medium
        );
        assert_eq!(
            TriggerPriority::classify(PlaceCategory::Store, 50),
            TriggerPriority::Low
        );
        assert_eq!(
            TriggerPriority::classify(PlaceCategory::Other, 120),
            TriggerPriority::Low
        );
    }

    #[test]
    fn test_priority_far_range_is_low() {
        assert_eq!(
            TriggerPriority::classify(PlaceCategory::Gym, 200),
            TriggerPriority::Low
        );
        assert_eq!(
            TriggerPriority::classify(PlaceCategory::Restaurant, 900),
            TriggerPriority::Low
        );
    }

    #[test]
    fn test_priority_ordering() {
        assert!(TriggerPriority::High < TriggerPriority::Medium);
        assert!(TriggerPriority::Medium < TriggerPriority::Low);
    }

    #[test]
    fn test_trigger_for_place() {
        let trigger = Trigger::for_place(&place(PlaceCategory::Restaurant), 12);
        assert_eq!(trigger.place_id, 1);
        assert_eq!(trigger.notification_type, NotificationType::FoodLog);
        assert_eq!(trigger.priority, TriggerPriority::High);
        assert!(trigger.should_vibrate);
        assert_eq!(trigger.icon, "restaurant");
        assert_eq!(trigger.message, "You're at Warung Bu Rudy. Log your meal?");
    }

    #[test]
    fn test_trigger_vibrates_only_below_close_range() {
        assert!(!Trigger::for_place(&place(PlaceCategory::Gym), 50).should_vibrate);
        assert!(Trigger::for_place(&place(PlaceCategory::Gym), 49).should_vibrate);
    }

    #[test]
    fn test_sort_triggers_by_priority_then_distance() {
        let mut triggers = vec![
            Trigger::for_place(&place(PlaceCategory::Store), 60),
            Trigger::for_place(&place(PlaceCategory::Gym), 150),
            Trigger::for_place(&place(PlaceCategory::Other), 30),
            Trigger::for_place(&place(PlaceCategory::Park), 70),
            Trigger::for_place(&place(PlaceCategory::Restaurant), 10),
        ];
        sort_triggers(&mut triggers);

        let order: Vec<(TriggerPriority, i64)> =
            triggers.iter().map(|t| (t.priority, t.distance)).collect();
        assert_eq!(
            order,
            vec![
                (TriggerPriority::High, 10),
                (TriggerPriority::High, 30),
                (TriggerPriority::Medium, 70),
                (TriggerPriority::Medium, 150),
                (TriggerPriority::Low, 60),
            ]
        );
    }

    #[test]
    fn test_trigger_serialization() {
        let trigger = Trigger::for_place(&place(PlaceCategory::Gym), 120);
        let json = serde_json::to_value(&trigger).unwrap();
        assert_eq!(json["placeId"], 1);
        assert_eq!(json["notificationType"], "ACTIVITY_LOG");
        assert_eq!(json["priority"], "MEDIUM");
        assert_eq!(json["distance"], 120);
        assert_eq!(json["shouldVibrate"], false);
        assert_eq!(json["icon"], "fitness_center");
    }

    #[test]
    fn test_check_response_metadata() {
        let response =
            TriggerCheckResponse::new(vec![], Position::new(-7.25, 112.75), 1_700_000_000_000);
        assert_eq!(response.metadata.count, 0);
        assert!(!response.metadata.should_notify);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["metadata"]["shouldNotify"], false);
        assert_eq!(json["metadata"]["timestamp"], 1_700_000_000_000_i64);
        assert_eq!(json["metadata"]["userLocation"]["latitude"], -7.25);
    }
}
