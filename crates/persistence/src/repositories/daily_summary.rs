//! Daily summary repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::entities::DailySummaryEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct DailySummaryRepository {
    pool: PgPool,
}

impl DailySummaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        date: NaiveDate,
        total_calories_in: i32,
    ) -> Result<DailySummaryEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_daily_summary");
        let result = sqlx::query_as::<_, DailySummaryEntity>(
            r#"
            INSERT INTO daily_summaries (user_id, date, total_calories_in)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(total_calories_in)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<DailySummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_daily_summary_by_id");
        let result = sqlx::query_as::<_, DailySummaryEntity>(
            r#"
            SELECT * FROM daily_summaries WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All summaries of a user, latest date first.
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<DailySummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_daily_summaries_by_user");
        let result = sqlx::query_as::<_, DailySummaryEntity>(
            r#"
            SELECT * FROM daily_summaries WHERE user_id = $1 ORDER BY date DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The most recently recorded summary for one day, if any.
    pub async fn find_by_user_and_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Option<DailySummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_daily_summary_by_date");
        let result = sqlx::query_as::<_, DailySummaryEntity>(
            r#"
            SELECT * FROM daily_summaries
            WHERE user_id = $1 AND date = $2
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        date: Option<NaiveDate>,
        total_calories_in: Option<i32>,
    ) -> Result<Option<DailySummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_daily_summary");
        let result = sqlx::query_as::<_, DailySummaryEntity>(
            r#"
            UPDATE daily_summaries SET
                date = COALESCE($2, date),
                total_calories_in = COALESCE($3, total_calories_in),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(date)
        .bind(total_calories_in)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_daily_summary");
        let result = sqlx::query(
            r#"
            DELETE FROM daily_summaries WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
