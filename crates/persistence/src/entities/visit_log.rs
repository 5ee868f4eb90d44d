//! Visit log entities (database row mappings).

use domain::models::visit_log::VisitWithPlace;
use domain::models::{PlaceCategory, VisitLog};
use sqlx::FromRow;

/// Database row mapping for the visit_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct VisitLogEntity {
    pub id: i64,
    pub user_id: i64,
    pub place_id: i64,
    pub entry_time: i64,
    pub exit_time: i64,
    pub duration_mins: i32,
}

impl From<VisitLogEntity> for VisitLog {
    fn from(entity: VisitLogEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            place_id: entity.place_id,
            entry_time: entity.entry_time,
            exit_time: entity.exit_time,
            duration_mins: entity.duration_mins,
        }
    }
}

/// A visit_logs row joined with the visited place.
#[derive(Debug, Clone, FromRow)]
pub struct VisitWithPlaceEntity {
    #[sqlx(flatten)]
    pub visit: VisitLogEntity,
    pub place_name: String,
    pub place_category: String,
}

impl From<VisitWithPlaceEntity> for VisitWithPlace {
    fn from(entity: VisitWithPlaceEntity) -> Self {
        Self {
            visit: entity.visit.into(),
            place_name: entity.place_name,
            place_category: entity
                .place_category
                .parse()
                .unwrap_or(PlaceCategory::Other),
        }
    }
}
