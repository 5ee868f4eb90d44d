//! EMA (mood) log repository for database operations.

use async_trait::async_trait;
use domain::models::EmaLog;
use domain::stores::EmaLogStore;
use domain::DomainError;
use shared::geo::{self, BoundingBox};
use sqlx::PgPool;

use crate::db::storage;
use crate::entities::EmaLogEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct EmaLogRepository {
    pool: PgPool,
}

impl EmaLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        mood_score: i32,
        context: Option<&str>,
        timestamp: i64,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<EmaLogEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_ema_log");
        let result = sqlx::query_as::<_, EmaLogEntity>(
            r#"
            INSERT INTO ema_logs (user_id, mood_score, context, timestamp, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(mood_score)
        .bind(context)
        .bind(timestamp)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<EmaLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_ema_log_by_id");
        let result = sqlx::query_as::<_, EmaLogEntity>(
            r#"
            SELECT * FROM ema_logs WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<EmaLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_ema_logs_by_user");
        let result = sqlx::query_as::<_, EmaLogEntity>(
            r#"
            SELECT * FROM ema_logs WHERE user_id = $1 ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Logs with `start <= timestamp <= end`, newest first.
    pub async fn find_by_user_between(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<EmaLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_ema_logs_between");
        let result = sqlx::query_as::<_, EmaLogEntity>(
            r#"
            SELECT * FROM ema_logs
            WHERE user_id = $1 AND timestamp BETWEEN $2 AND $3
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Positioned logs within `radius_km` (Haversine) of the point.
    pub async fn find_by_user_near(
        &self,
        user_id: i64,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<EmaLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_ema_logs_near");
        let rows = sqlx::query_as::<_, EmaLogEntity>(
            r#"
            SELECT * FROM ema_logs
            WHERE user_id = $1 AND latitude IS NOT NULL AND longitude IS NOT NULL
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(rows
            .into_iter()
            .filter(|row| match (row.latitude, row.longitude) {
                (Some(lat), Some(lon)) => {
                    geo::distance_km(latitude, longitude, lat, lon) <= radius_km
                }
                _ => false,
            })
            .collect())
    }

    pub async fn update(&self, log: &EmaLog) -> Result<Option<EmaLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_ema_log");
        let result = sqlx::query_as::<_, EmaLogEntity>(
            r#"
            UPDATE ema_logs SET
                mood_score = $2,
                context = $3,
                timestamp = $4,
                latitude = $5,
                longitude = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(log.id)
        .bind(log.mood_score)
        .bind(log.context.as_deref())
        .bind(log.timestamp)
        .bind(log.latitude)
        .bind(log.longitude)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_ema_log");
        let result = sqlx::query(
            r#"
            DELETE FROM ema_logs WHERE id = $1
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
impl EmaLogStore for EmaLogRepository {
    async fn find_recent(
        &self,
        user_id: i64,
        since: i64,
        area: Option<BoundingBox>,
    ) -> Result<Vec<EmaLog>, DomainError> {
        let timer = QueryTimer::new("find_recent_ema_logs");
        let result = match area {
            Some(area) => {
                sqlx::query_as::<_, EmaLogEntity>(
                    r#"
                    SELECT * FROM ema_logs
                    WHERE user_id = $1 AND timestamp >= $2
                      AND latitude BETWEEN $3 AND $4
                      AND longitude BETWEEN $5 AND $6
                    ORDER BY timestamp DESC
                    "#,
                )
                .bind(user_id)
                .bind(since)
                .bind(area.min_lat)
                .bind(area.max_lat)
                .bind(area.min_lon)
                .bind(area.max_lon)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, EmaLogEntity>(
                    r#"
                    SELECT * FROM ema_logs
                    WHERE user_id = $1 AND timestamp >= $2
                    ORDER BY timestamp DESC
                    "#,
                )
                .bind(user_id)
                .bind(since)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
            .map(|rows| rows.into_iter().map(EmaLog::from).collect())
            .map_err(storage)
    }
}
