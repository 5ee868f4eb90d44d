//! User repository for database operations.

use async_trait::async_trait;
use domain::models::User;
use domain::stores::UserStore;
use domain::DomainError;
use sqlx::PgPool;

use crate::db::storage;
use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        bmi_goal: Option<f64>,
        height_cm: Option<f64>,
        weight_kg: Option<f64>,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (username, email, password_hash, bmi_goal, height_cm, weight_kg)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(bmi_goal)
        .bind(height_cm)
        .bind(weight_kg)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Case-insensitive lookup by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("user_exists");
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(row.0)
    }

    /// How many of `ids` (already deduplicated) name existing users.
    pub async fn count_existing(&self, ids: &[i64]) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_existing_users");
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM users WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(row.0)
    }

    pub async fn find_many(&self, ids: &[i64]) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_users_by_ids");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Partial update; `None` leaves the column unchanged.
    pub async fn update(
        &self,
        id: i64,
        username: Option<&str>,
        bmi_goal: Option<f64>,
        height_cm: Option<f64>,
        weight_kg: Option<f64>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                bmi_goal = COALESCE($3, bmi_goal),
                height_cm = COALESCE($4, height_cm),
                weight_kg = COALESCE($5, weight_kg),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(bmi_goal)
        .bind(height_cm)
        .bind(weight_kg)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn exists(&self, user_id: i64) -> Result<bool, DomainError> {
        UserRepository::exists(self, user_id).await.map_err(storage)
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, DomainError> {
        UserRepository::find_by_id(self, user_id)
            .await
            .map(|user| user.map(User::from))
            .map_err(storage)
    }

    async fn find_many(&self, user_ids: &[i64]) -> Result<Vec<User>, DomainError> {
        UserRepository::find_many(self, user_ids)
            .await
            .map(|users| users.into_iter().map(User::from).collect())
            .map_err(storage)
    }
}
