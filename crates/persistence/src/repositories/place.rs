//! Place repository for database operations.

use async_trait::async_trait;
use domain::models::{Place, PlaceCategory};
use domain::stores::PlaceStore;
use domain::DomainError;
use sqlx::PgPool;

use crate::db::storage;
use crate::entities::PlaceEntity;
use crate::metrics::QueryTimer;

/// Repository for place-related database operations.
#[derive(Clone)]
pub struct PlaceRepository {
    pool: PgPool,
}

impl PlaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        category: PlaceCategory,
        latitude: f64,
        longitude: f64,
        geofence_radius: i32,
    ) -> Result<PlaceEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_place");
        let result = sqlx::query_as::<_, PlaceEntity>(
            r#"
            INSERT INTO places (name, category, latitude, longitude, geofence_radius)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(category.as_str())
        .bind(latitude)
        .bind(longitude)
        .bind(geofence_radius)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_all(&self) -> Result<Vec<PlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_all_places");
        let result = sqlx::query_as::<_, PlaceEntity>(
            r#"
            SELECT * FROM places ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<PlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_place_by_id");
        let result = sqlx::query_as::<_, PlaceEntity>(
            r#"
            SELECT * FROM places WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_category(
        &self,
        category: PlaceCategory,
    ) -> Result<Vec<PlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_places_by_category");
        let result = sqlx::query_as::<_, PlaceEntity>(
            r#"
            SELECT * FROM places WHERE category = $1 ORDER BY name
            "#,
        )
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Partial update; `None` leaves the column unchanged.
    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        category: Option<PlaceCategory>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        geofence_radius: Option<i32>,
    ) -> Result<Option<PlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_place");
        let result = sqlx::query_as::<_, PlaceEntity>(
            r#"
            UPDATE places SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                geofence_radius = COALESCE($6, geofence_radius),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category.map(|c| c.as_str()))
        .bind(latitude)
        .bind(longitude)
        .bind(geofence_radius)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_place");
        let result = sqlx::query(
            r#"
            DELETE FROM places WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl PlaceStore for PlaceRepository {
    async fn find_all(&self) -> Result<Vec<Place>, DomainError> {
        PlaceRepository::find_all(self)
            .await
            .map(|places| places.into_iter().map(Place::from).collect())
            .map_err(storage)
    }

    async fn find_by_id(&self, place_id: i64) -> Result<Option<Place>, DomainError> {
        PlaceRepository::find_by_id(self, place_id)
            .await
            .map(|place| place.map(Place::from))
            .map_err(storage)
    }
}
