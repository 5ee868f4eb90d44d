//! In-memory store for development and testing.
//!
//! Implements every store trait over plain vectors so services can be
//! exercised without a database.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use shared::geo::BoundingBox;

use crate::error::DomainError;
use crate::models::visit_log::VisitWithPlace;
use crate::models::{
    ActivityLog, EmaLog, FoodLog, Friendship, FriendshipStatus, LogEvent, Place, User, VisitLog,
};
use crate::stores::{
    ActivityLogStore, EmaLogStore, FoodLogStore, FriendshipStore, PlaceStore, Stores, UserStore,
    VisitLogStore,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    places: Vec<Place>,
    food_logs: Vec<FoodLog>,
    activity_logs: Vec<ActivityLog>,
    ema_logs: Vec<EmaLog>,
    visit_logs: Vec<VisitLog>,
    friendships: Vec<Friendship>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    /// Whether every read fails with a storage error.
    pub simulate_failure: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose reads all fail.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, DomainError> {
        if self.simulate_failure {
            return Err(DomainError::Storage("Simulated failure".to_string()));
        }
        Ok(self.tables.read().unwrap_or_else(|e| e.into_inner()))
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert_user(&self, user: User) {
        self.write().users.push(user);
    }

    pub fn insert_place(&self, place: Place) {
        self.write().places.push(place);
    }

    pub fn insert_food_log(&self, log: FoodLog) {
        self.write().food_logs.push(log);
    }

    pub fn insert_activity_log(&self, log: ActivityLog) {
        self.write().activity_logs.push(log);
    }

    pub fn insert_ema_log(&self, log: EmaLog) {
        self.write().ema_logs.push(log);
    }

    pub fn insert_visit_log(&self, log: VisitLog) {
        self.write().visit_logs.push(log);
    }

    pub fn insert_friendship(&self, friendship: Friendship) {
        self.write().friendships.push(friendship);
    }

    /// Shares this store behind every store trait.
    pub fn into_stores(self: Arc<Self>) -> Stores {
        Stores {
            users: self.clone(),
            places: self.clone(),
            food_logs: self.clone(),
            activity_logs: self.clone(),
            ema_logs: self.clone(),
            visit_logs: self.clone(),
            friendships: self,
        }
    }
}

fn in_area<E: LogEvent>(event: &E, area: Option<BoundingBox>) -> bool {
    match area {
        None => true,
        Some(area) => event
            .position()
            .is_some_and(|p| area.contains(p.latitude, p.longitude)),
    }
}

fn newest_first<E: LogEvent>(mut events: Vec<E>, limit: i64) -> Vec<E> {
    events.sort_by_key(|e| std::cmp::Reverse(e.occurred_at_ms()));
    events.truncate(usize::try_from(limit).unwrap_or(0));
    events
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn exists(&self, user_id: i64) -> Result<bool, DomainError> {
        Ok(self.read()?.users.iter().any(|u| u.id == user_id))
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.read()?.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_many(&self, user_ids: &[i64]) -> Result<Vec<User>, DomainError> {
        Ok(self
            .read()?
            .users
            .iter()
            .filter(|u| user_ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PlaceStore for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Place>, DomainError> {
        Ok(self.read()?.places.clone())
    }

    async fn find_by_id(&self, place_id: i64) -> Result<Option<Place>, DomainError> {
        Ok(self.read()?.places.iter().find(|p| p.id == place_id).cloned())
    }
}

#[async_trait]
impl FoodLogStore for InMemoryStore {
    async fn find_recent(
        &self,
        user_id: i64,
        since: i64,
        area: Option<BoundingBox>,
    ) -> Result<Vec<FoodLog>, DomainError> {
        Ok(self
            .read()?
            .food_logs
            .iter()
            .filter(|l| l.user_id == user_id && l.timestamp >= since && in_area(*l, area))
            .cloned()
            .collect())
    }

    async fn find_in_range(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<FoodLog>, DomainError> {
        Ok(self
            .read()?
            .food_logs
            .iter()
            .filter(|l| l.user_id == user_id && l.timestamp >= start && l.timestamp < end)
            .cloned()
            .collect())
    }

    async fn find_latest(&self, user_id: i64, limit: i64) -> Result<Vec<FoodLog>, DomainError> {
        let logs = self
            .read()?
            .food_logs
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(logs, limit))
    }

    async fn find_latest_for_users(
        &self,
        user_ids: &[i64],
        limit: i64,
    ) -> Result<Vec<FoodLog>, DomainError> {
        let logs = self
            .read()?
            .food_logs
            .iter()
            .filter(|l| user_ids.contains(&l.user_id))
            .cloned()
            .collect();
        Ok(newest_first(logs, limit))
    }
}

#[async_trait]
impl ActivityLogStore for InMemoryStore {
    async fn find_recent(
        &self,
        user_id: i64,
        since: i64,
    ) -> Result<Vec<ActivityLog>, DomainError> {
        Ok(self
            .read()?
            .activity_logs
            .iter()
            .filter(|l| l.user_id == user_id && l.start_time >= since)
            .cloned()
            .collect())
    }

    async fn find_in_range(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<ActivityLog>, DomainError> {
        Ok(self
            .read()?
            .activity_logs
            .iter()
            .filter(|l| l.user_id == user_id && l.start_time >= start && l.start_time < end)
            .cloned()
            .collect())
    }

    async fn find_latest_for_users(
        &self,
        user_ids: &[i64],
        limit: i64,
    ) -> Result<Vec<ActivityLog>, DomainError> {
        let logs = self
            .read()?
            .activity_logs
            .iter()
            .filter(|l| user_ids.contains(&l.user_id))
            .cloned()
            .collect();
        Ok(newest_first(logs, limit))
    }
}

#[async_trait]
impl EmaLogStore for InMemoryStore {
    async fn find_recent(
        &self,
        user_id: i64,
        since: i64,
        area: Option<BoundingBox>,
    ) -> Result<Vec<EmaLog>, DomainError> {
        Ok(self
            .read()?
            .ema_logs
            .iter()
            .filter(|l| l.user_id == user_id && l.timestamp >= since && in_area(*l, area))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl VisitLogStore for InMemoryStore {
    async fn find_recent(
        &self,
        user_id: i64,
        place_id: Option<i64>,
        since: i64,
    ) -> Result<Vec<VisitLog>, DomainError> {
        Ok(self
            .read()?
            .visit_logs
            .iter()
            .filter(|v| {
                v.user_id == user_id
                    && v.entry_time >= since
                    && place_id.map_or(true, |id| v.place_id == id)
            })
            .cloned()
            .collect())
    }

    async fn find_in_range(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<VisitLog>, DomainError> {
        Ok(self
            .read()?
            .visit_logs
            .iter()
            .filter(|v| v.user_id == user_id && v.entry_time >= start && v.entry_time < end)
            .cloned()
            .collect())
    }

    async fn find_latest_with_place(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<VisitWithPlace>, DomainError> {
        let tables = self.read()?;
        let visits = tables
            .visit_logs
            .iter()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(visits, limit)
            .into_iter()
            .filter_map(|visit| {
                let place = tables.places.iter().find(|p| p.id == visit.place_id)?;
                Some(VisitWithPlace {
                    place_name: place.name.clone(),
                    place_category: place.category,
                    visit,
                })
            })
            .collect())
    }
}

#[async_trait]
impl FriendshipStore for InMemoryStore {
    async fn accepted_friend_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError> {
        Ok(self
            .read()?
            .friendships
            .iter()
            .filter(|f| f.status == FriendshipStatus::Accepted)
            .filter_map(|f| f.other_party(user_id))
            .collect())
    }
}
