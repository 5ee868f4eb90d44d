//! Food repository for database operations.

use sqlx::PgPool;

use crate::entities::FoodEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct FoodRepository {
    pool: PgPool,
}

impl FoodRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str, calories: f64) -> Result<FoodEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_food");
        let result = sqlx::query_as::<_, FoodEntity>(
            r#"
            INSERT INTO foods (name, calories)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(calories)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<FoodEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_food_by_id");
        let result = sqlx::query_as::<_, FoodEntity>(
            r#"
            SELECT * FROM foods WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn name_exists(&self, name: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("food_name_exists");
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM foods WHERE LOWER(name) = LOWER($1))
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(row.0)
    }

    /// Foods whose name contains `name` (case-insensitive), or all foods.
    pub async fn search(&self, name: Option<&str>) -> Result<Vec<FoodEntity>, sqlx::Error> {
        let timer = QueryTimer::new("search_foods");
        let result = sqlx::query_as::<_, FoodEntity>(
            r#"
            SELECT * FROM foods
            WHERE $1::TEXT IS NULL OR name ILIKE '%' || $1 || '%'
            ORDER BY name
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// How many of `ids` refer to existing foods.
    pub async fn count_existing(&self, ids: &[i64]) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_existing_foods");
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM foods WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(row.0)
    }
}
