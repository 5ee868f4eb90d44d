//! Visit log repository for database operations.

use async_trait::async_trait;
use domain::models::visit_log::VisitWithPlace;
use domain::models::VisitLog;
use domain::stores::VisitLogStore;
use domain::DomainError;
use sqlx::PgPool;

use crate::db::storage;
use crate::entities::{VisitLogEntity, VisitWithPlaceEntity};
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct VisitLogRepository {
    pool: PgPool,
}

impl VisitLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        place_id: i64,
        entry_time: i64,
        exit_time: i64,
        duration_mins: i32,
    ) -> Result<VisitLogEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_visit_log");
        let result = sqlx::query_as::<_, VisitLogEntity>(
            r#"
            INSERT INTO visit_logs (user_id, place_id, entry_time, exit_time, duration_mins)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(place_id)
        .bind(entry_time)
        .bind(exit_time)
        .bind(duration_mins)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<VisitLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_visit_log_by_id");
        let result = sqlx::query_as::<_, VisitLogEntity>(
            r#"
            SELECT * FROM visit_logs WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<VisitLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_visit_logs_by_user");
        let result = sqlx::query_as::<_, VisitLogEntity>(
            r#"
            SELECT * FROM visit_logs WHERE user_id = $1 ORDER BY entry_time DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_place(&self, place_id: i64) -> Result<Vec<VisitLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_visit_logs_by_place");
        let result = sqlx::query_as::<_, VisitLogEntity>(
            r#"
            SELECT * FROM visit_logs WHERE place_id = $1 ORDER BY entry_time DESC, id DESC
            "#,
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Visits with `start <= entry_time <= end`, newest first.
    pub async fn find_by_user_between(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<VisitLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_visit_logs_between");
        let result = sqlx::query_as::<_, VisitLogEntity>(
            r#"
            SELECT * FROM visit_logs
            WHERE user_id = $1 AND entry_time BETWEEN $2 AND $3
            ORDER BY entry_time DESC, id DESC
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

    /// Writes the times and duration of an already merged visit.
    pub async fn update(&self, visit: &VisitLog) -> Result<Option<VisitLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_visit_log");
        let result = sqlx::query_as::<_, VisitLogEntity>(
            r#"
            UPDATE visit_logs SET
                entry_time = $2,
                exit_time = $3,
                duration_mins = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(visit.id)
        .bind(visit.entry_time)
        .bind(visit.exit_time)
        .bind(visit.duration_mins)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_visit_log");
        let result = sqlx::query(
            r#"
            DELETE FROM visit_logs WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

fn to_domain(rows: Vec<VisitLogEntity>) -> Vec<VisitLog> {
    rows.into_iter().map(VisitLog::from).collect()
}

#[async_trait]
impl VisitLogStore for VisitLogRepository {
    async fn find_recent(
        &self,
        user_id: i64,
        place_id: Option<i64>,
        since: i64,
    ) -> Result<Vec<VisitLog>, DomainError> {
        let timer = QueryTimer::new("find_recent_visit_logs");
        let result = sqlx::query_as::<_, VisitLogEntity>(
            r#"
            SELECT * FROM visit_logs
            WHERE user_id = $1
              AND ($2::BIGINT IS NULL OR place_id = $2)
              AND entry_time >= $3
            ORDER BY entry_time DESC
            "#,
        )
        .bind(user_id)
        .bind(place_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result.map(to_domain).map_err(storage)
    }

    async fn find_in_range(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<VisitLog>, DomainError> {
        let timer = QueryTimer::new("find_visit_logs_in_range");
        let result = sqlx::query_as::<_, VisitLogEntity>(
            r#"
            SELECT * FROM visit_logs
            WHERE user_id = $1 AND entry_time >= $2 AND entry_time < $3
            ORDER BY entry_time
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result.map(to_domain).map_err(storage)
    }

    async fn find_latest_with_place(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<VisitWithPlace>, DomainError> {
        let timer = QueryTimer::new("find_latest_visits_with_place");
        let result = sqlx::query_as::<_, VisitWithPlaceEntity>(
            r#"
            SELECT v.*, p.name AS place_name, p.category AS place_category
            FROM visit_logs v
            JOIN places p ON p.id = v.place_id
            WHERE v.user_id = $1
            ORDER BY v.entry_time DESC, v.id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(VisitWithPlace::from).collect())
            .map_err(storage)
    }
}
