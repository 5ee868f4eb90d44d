//! Food log repository for database operations.
//!
//! A food log is stored as one `food_logs` row plus its `food_log_items`
//! rows; reads assemble both into the domain [`FoodLog`].

use async_trait::async_trait;
use domain::models::FoodLog;
use domain::stores::FoodLogStore;
use domain::DomainError;
use shared::geo::BoundingBox;
use sqlx::PgPool;

use crate::db::storage;
use crate::entities::{FoodLogEntity, FoodLogItemEntity};
use crate::metrics::QueryTimer;

/// One line of a food log being created.
#[derive(Debug, Clone, Copy)]
pub struct NewFoodLogItem {
    pub food_id: i64,
    pub quantity: Option<i32>,
    pub calories: Option<f64>,
}

#[derive(Clone)]
pub struct FoodLogRepository {
    pool: PgPool,
}

impl FoodLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the log and its items in one transaction.
    pub async fn create(
        &self,
        user_id: i64,
        timestamp: i64,
        latitude: Option<f64>,
        longitude: Option<f64>,
        items: &[NewFoodLogItem],
    ) -> Result<FoodLog, sqlx::Error> {
        let timer = QueryTimer::new("create_food_log");
        let mut tx = self.pool.begin().await?;

        let log = sqlx::query_as::<_, FoodLogEntity>(
            r#"
            INSERT INTO food_logs (user_id, timestamp, latitude, longitude)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(timestamp)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO food_log_items (log_id, food_id, quantity, calories)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(log.id)
            .bind(item.food_id)
            .bind(item.quantity)
            .bind(item.calories)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();

        let items = self.find_items(&[log.id]).await?;
        Ok(log.into_food_log(&items))
    }

    async fn find_items(&self, log_ids: &[i64]) -> Result<Vec<FoodLogItemEntity>, sqlx::Error> {
        if log_ids.is_empty() {
            return Ok(Vec::new());
        }
        let timer = QueryTimer::new("find_food_log_items");
        let result = sqlx::query_as::<_, FoodLogItemEntity>(
            r#"
            SELECT i.id, i.log_id, i.food_id, f.name AS food_name, f.calories AS food_calories,
                   i.quantity, i.calories
            FROM food_log_items i
            JOIN foods f ON f.id = i.food_id
            WHERE i.log_id = ANY($1)
            ORDER BY i.id
            "#,
        )
        .bind(log_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    async fn with_items(&self, logs: Vec<FoodLogEntity>) -> Result<Vec<FoodLog>, sqlx::Error> {
        let ids: Vec<i64> = logs.iter().map(|l| l.id).collect();
        let items = self.find_items(&ids).await?;
        Ok(logs.into_iter().map(|l| l.into_food_log(&items)).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<FoodLog>, sqlx::Error> {
        let timer = QueryTimer::new("find_food_log_by_id");
        let log = sqlx::query_as::<_, FoodLogEntity>(
            r#"
            SELECT * FROM food_logs WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        match log {
            Some(log) => Ok(self.with_items(vec![log]).await?.pop()),
            None => Ok(None),
        }
    }

    /// All logs of a user, newest first.
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<FoodLog>, sqlx::Error> {
        let timer = QueryTimer::new("find_food_logs_by_user");
        let logs = sqlx::query_as::<_, FoodLogEntity>(
            r#"
            SELECT * FROM food_logs WHERE user_id = $1 ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        self.with_items(logs).await
    }

    /// Logs with `start <= timestamp <= end`, newest first.
    pub async fn find_by_user_between(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<FoodLog>, sqlx::Error> {
        let timer = QueryTimer::new("find_food_logs_between");
        let logs = sqlx::query_as::<_, FoodLogEntity>(
            r#"
            SELECT * FROM food_logs
            WHERE user_id = $1 AND timestamp BETWEEN $2 AND $3
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        self.with_items(logs).await
    }

    /// Moves or re-times a meal; absent fields keep their value.
    pub async fn update(
        &self,
        id: i64,
        timestamp: Option<i64>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<FoodLog>, sqlx::Error> {
        let timer = QueryTimer::new("update_food_log");
        let log = sqlx::query_as::<_, FoodLogEntity>(
            r#"
            UPDATE food_logs SET
                timestamp = COALESCE($2, timestamp),
                latitude = COALESCE($3, latitude),
                longitude = COALESCE($4, longitude)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(timestamp)
        .bind(latitude)
        .bind(longitude)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        match log {
            Some(log) => Ok(self.with_items(vec![log]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("food_log_exists");
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM food_logs WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(row.0)
    }

    /// Appends one line to an existing log.
    pub async fn add_item(
        &self,
        log_id: i64,
        item: NewFoodLogItem,
    ) -> Result<FoodLogItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_food_log_item");
        let result = sqlx::query_as::<_, FoodLogItemEntity>(
            r#"
            WITH i AS (
                INSERT INTO food_log_items (log_id, food_id, quantity, calories)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT i.id, i.log_id, i.food_id, f.name AS food_name, f.calories AS food_calories,
                   i.quantity, i.calories
            FROM i
            JOIN foods f ON f.id = i.food_id
            "#,
        )
        .bind(log_id)
        .bind(item.food_id)
        .bind(item.quantity)
        .bind(item.calories)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_item(&self, id: i64) -> Result<Option<FoodLogItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_food_log_item");
        let result = sqlx::query_as::<_, FoodLogItemEntity>(
            r#"
            SELECT i.id, i.log_id, i.food_id, f.name AS food_name, f.calories AS food_calories,
                   i.quantity, i.calories
            FROM food_log_items i
            JOIN foods f ON f.id = i.food_id
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lines of one log in insertion order.
    pub async fn find_items_by_log(
        &self,
        log_id: i64,
    ) -> Result<Vec<FoodLogItemEntity>, sqlx::Error> {
        self.find_items(&[log_id]).await
    }

    /// Changes a line's quantity or calorie override; absent fields keep
    /// their value.
    pub async fn update_item(
        &self,
        id: i64,
        quantity: Option<i32>,
        calories: Option<f64>,
    ) -> Result<Option<FoodLogItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_food_log_item");
        let result = sqlx::query_as::<_, FoodLogItemEntity>(
            r#"
            WITH i AS (
                UPDATE food_log_items SET
                    quantity = COALESCE($2, quantity),
                    calories = COALESCE($3, calories)
                WHERE id = $1
                RETURNING *
            )
            SELECT i.id, i.log_id, i.food_id, f.name AS food_name, f.calories AS food_calories,
                   i.quantity, i.calories
            FROM i
            JOIN foods f ON f.id = i.food_id
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(calories)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete_item(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_food_log_item");
        let result = sqlx::query(
            r#"
            DELETE FROM food_log_items WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Returns the number of rows deleted (0 or 1). Items cascade.
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_food_log");
        let result = sqlx::query(
            r#"
            DELETE FROM food_logs WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    async fn find_recent_entities(
        &self,
        user_id: i64,
        since: i64,
        area: Option<BoundingBox>,
    ) -> Result<Vec<FoodLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_recent_food_logs");
        let result = match area {
            Some(area) => {
                sqlx::query_as::<_, FoodLogEntity>(
                    r#"
                    SELECT * FROM food_logs
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
                sqlx::query_as::<_, FoodLogEntity>(
                    r#"
                    SELECT * FROM food_logs
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
    }

    async fn find_latest_entities(
        &self,
        user_ids: &[i64],
        limit: i64,
    ) -> Result<Vec<FoodLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_latest_food_logs");
        let result = sqlx::query_as::<_, FoodLogEntity>(
            r#"
            SELECT * FROM food_logs
            WHERE user_id = ANY($1)
            ORDER BY timestamp DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_ids)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl FoodLogStore for FoodLogRepository {
    async fn find_recent(
        &self,
        user_id: i64,
        since: i64,
        area: Option<BoundingBox>,
    ) -> Result<Vec<FoodLog>, DomainError> {
        let logs = self
            .find_recent_entities(user_id, since, area)
            .await
            .map_err(storage)?;
        self.with_items(logs).await.map_err(storage)
    }

    async fn find_in_range(
        &self,
        user_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<FoodLog>, DomainError> {
        let timer = QueryTimer::new("find_food_logs_in_range");
        let logs = sqlx::query_as::<_, FoodLogEntity>(
            r#"
            SELECT * FROM food_logs
            WHERE user_id = $1 AND timestamp >= $2 AND timestamp < $3
            ORDER BY timestamp
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        timer.record();
        self.with_items(logs).await.map_err(storage)
    }

    async fn find_latest(&self, user_id: i64, limit: i64) -> Result<Vec<FoodLog>, DomainError> {
        let logs = self
            .find_latest_entities(&[user_id], limit)
            .await
            .map_err(storage)?;
        self.with_items(logs).await.map_err(storage)
    }

    async fn find_latest_for_users(
        &self,
        user_ids: &[i64],
        limit: i64,
    ) -> Result<Vec<FoodLog>, DomainError> {
        let logs = self
            .find_latest_entities(user_ids, limit)
            .await
            .map_err(storage)?;
        self.with_items(logs).await.map_err(storage)
    }
}
