//! Queries shared by tags and ingredients. Table names come from
//! `RecipeAttribute::TABLE`, which is a compile-time constant.

use sqlx::{PgPool, Postgres};

use crate::models::RecipeAttribute;

pub async fn list<T: RecipeAttribute>(pool: &PgPool, user_id: i64) -> Result<Vec<T>, sqlx::Error> {
    let sql = format!(
        "SELECT * FROM {} WHERE user_id = $1 ORDER BY name DESC, id DESC",
        T::TABLE
    );
    sqlx::query_as::<Postgres, T>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn create<T: RecipeAttribute>(
    pool: &PgPool,
    user_id: i64,
    name: &str,
) -> Result<T, sqlx::Error> {
    let sql = format!(
        "INSERT INTO {} (user_id, name) VALUES ($1, $2) RETURNING *",
        T::TABLE
    );
    sqlx::query_as::<Postgres, T>(&sql)
        .bind(user_id)
        .bind(name)
        .fetch_one(pool)
        .await
}

pub async fn find_by_id<T: RecipeAttribute>(
    pool: &PgPool,
    id: i64,
    user_id: i64,
) -> Result<Option<T>, sqlx::Error> {
    let sql = format!("SELECT * FROM {} WHERE id = $1 AND user_id = $2", T::TABLE);
    sqlx::query_as::<Postgres, T>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Returns `RowNotFound` when the row does not exist for this user.
pub async fn update<T: RecipeAttribute>(
    pool: &PgPool,
    id: i64,
    user_id: i64,
    name: &str,
) -> Result<T, sqlx::Error> {
    let sql = format!(
        "UPDATE {} SET name = $3 WHERE id = $1 AND user_id = $2 RETURNING *",
        T::TABLE
    );
    sqlx::query_as::<Postgres, T>(&sql)
        .bind(id)
        .bind(user_id)
        .bind(name)
        .fetch_one(pool)
        .await
}

/// Returns whether a row was deleted.
pub async fn delete<T: RecipeAttribute>(
    pool: &PgPool,
    id: i64,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", T::TABLE);
    let result = sqlx::query::<Postgres>(&sql)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
