//! Activity log repository for database operations.

use async_trait::async_trait;
use domain::models::ActivityLog;
use domain::stores::ActivityLogStore;
use domain::DomainError;
use sqlx::PgPool;

use crate::db::storage;
use crate::entities::ActivityLogEntity;
use crate::metrics::QueryTimer;

/// One activity of a batch insert.
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub user_id: i64,
    pub activity_type: String,
    pub start_time: i64,
    pub end_time: i64,
    pub confidence: i32,
}

#[derive(Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        activity_type: &str,
        start_time: i64,
        end_time: i64,
        confidence: i32,
    ) -> Result<ActivityLogEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_activity_log");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            INSERT INTO activity_logs (user_id, activity_type, start_time, end_time, confidence)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(activity_type)
        .bind(start_time)
        .bind(end_time)
        .bind(confidence)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Inserts every activity in one transaction; nothing is kept if any
    /// row fails. Returned rows follow input order.
    pub async fn create_many(
        &self,
        activities: &[NewActivityLog],
    ) -> Result<Vec<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("create_activity_logs_bulk");
        let mut tx = self.pool.begin().await?;

        let mut created = Vec::with_capacity(activities.len());
        for activity in activities {
            let row = sqlx::query_as::<_, ActivityLogEntity>(
                r#"
                INSERT INTO activity_logs (user_id, activity_type, start_time, end_time, confidence)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(activity.user_id)
            .bind(&activity.activity_type)
            .bind(activity.start_time)
            .bind(activity.end_time)
            .bind(activity.confidence)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;
        timer.record();
        Ok(created)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_activity_log_by_id");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            SELECT * FROM activity_logs WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All activities of a user, newest first.
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_activity_logs_by_user");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            SELECT * FROM activity_logs WHERE user_id = $1 ORDER BY start_time DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Activities of one (upper-case) type, newest first.
    pub async fn find_by_user_and_type(
        &self,
        user_id: i64,
        activity_type: &str,
    ) -> Result<Vec<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_activity_logs_by_type");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            SELECT * FROM activity_logs
            WHERE user_id = $1 AND activity_type = $2
            ORDER BY start_time DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(activity_type)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Activities with `start <= start_time <= end`, newest first.
    pub async fn find_by_user_between(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_activity_logs_between");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            SELECT * FROM activity_logs
            WHERE user_id = $1 AND start_time BETWEEN $2 AND $3
            ORDER BY start_time DESC, id DESC
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

    /// The most recent activity started at or after `since`.
    pub async fn find_current(
        &self,
        user_id: i64,
        since: i64,
    ) -> Result<Option<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_current_activity");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            SELECT * FROM activity_logs
            WHERE user_id = $1 AND start_time >= $2
            ORDER BY start_time DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Writes every mutable column of an already merged activity.
    pub async fn update(
        &self,
        activity: &ActivityLog,
    ) -> Result<Option<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_activity_log");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            UPDATE activity_logs SET
                activity_type = $2,
                start_time = $3,
                end_time = $4,
                confidence = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(activity.id)
        .bind(&activity.activity_type)
        .bind(activity.start_time)
        .bind(activity.end_time)
        .bind(activity.confidence)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_activity_log");
        let result = sqlx::query(
            r#"
            DELETE FROM activity_logs WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

fn to_domain(rows: Vec<ActivityLogEntity>) -> Vec<ActivityLog> {
    rows.into_iter().map(ActivityLog::from).collect()
}

#[async_trait]
impl ActivityLogStore for ActivityLogRepository {
    async fn find_recent(
        &self,
        user_id: i64,
        since: i64,
    ) -> Result<Vec<ActivityLog>, DomainError> {
        let timer = QueryTimer::new("find_recent_activity_logs");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            SELECT * FROM activity_logs
            WHERE user_id = $1 AND start_time >= $2
            ORDER BY start_time DESC
            "#,
        )
        .bind(user_id)
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
    ) -> Result<Vec<ActivityLog>, DomainError> {
        let timer = QueryTimer::new("find_activity_logs_in_range");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            SELECT * FROM activity_logs
            WHERE user_id = $1 AND start_time >= $2 AND start_time < $3
            ORDER BY start_time
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

    async fn find_latest_for_users(
        &self,
        user_ids: &[i64],
        limit: i64,
    ) -> Result<Vec<ActivityLog>, DomainError> {
        let timer = QueryTimer::new("find_latest_activity_logs");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            SELECT * FROM activity_logs
            WHERE user_id = ANY($1)
            ORDER BY start_time DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_ids)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result.map(to_domain).map_err(storage)
    }
}
