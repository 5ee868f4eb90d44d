//! Friendship repository for database operations.

use async_trait::async_trait;
use domain::models::FriendshipStatus;
use domain::stores::FriendshipStore;
use domain::DomainError;
use sqlx::PgPool;

use crate::db::storage;
use crate::entities::FriendshipEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct FriendshipRepository {
    pool: PgPool,
}

impl FriendshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        requester_id: i64,
        addressee_id: i64,
    ) -> Result<FriendshipEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_friendship");
        let result = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            INSERT INTO friendships (requester_id, addressee_id, status)
            VALUES ($1, $2, 'pending')
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(addressee_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<FriendshipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_friendship_by_id");
        let result = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT * FROM friendships WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The friendship between two users, in either direction.
    pub async fn find_between(
        &self,
        user_a: i64,
        user_b: i64,
    ) -> Result<Option<FriendshipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_friendship_between");
        let result = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT * FROM friendships
            WHERE (requester_id = $1 AND addressee_id = $2)
               OR (requester_id = $2 AND addressee_id = $1)
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Every friendship the user is a party to, newest first.
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<FriendshipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_friendships_by_user");
        let result = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT * FROM friendships
            WHERE requester_id = $1 OR addressee_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_friendship_status");
        let result = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            UPDATE friendships SET status = $2 WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_friendship");
        let result = sqlx::query(
            r#"
            DELETE FROM friendships WHERE id = $1
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
impl FriendshipStore for FriendshipRepository {
    async fn accepted_friend_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError> {
        let timer = QueryTimer::new("find_accepted_friend_ids");
        let result: Result<Vec<(i64,)>, sqlx::Error> = sqlx::query_as(
            r#"
            SELECT CASE WHEN requester_id = $1 THEN addressee_id ELSE requester_id END
            FROM friendships
            WHERE (requester_id = $1 OR addressee_id = $1) AND status = 'accepted'
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
            .map(|rows| rows.into_iter().map(|(id,)| id).collect())
            .map_err(storage)
    }
}
