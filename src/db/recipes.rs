use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::Recipe;

/// Column values for a recipe write. On update, `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct RecipeFields {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub description: Option<String>,
}

pub async fn list(pool: &PgPool, user_id: i64) -> Result<Vec<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE user_id = $1 ORDER BY id DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    user_id: i64,
    title: &str,
    time_minutes: i32,
    price: Decimal,
    link: &str,
    description: &str,
) -> Result<Recipe, sqlx::Error> {
    sqlx::query_as::<_, Recipe>(
        "INSERT INTO recipes (user_id, title, time_minutes, price, link, description)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(user_id)
    .bind(title)
    .bind(time_minutes)
    .bind(price)
    .bind(link)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: i64,
    user_id: i64,
) -> Result<Option<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Returns `RowNotFound` when the recipe does not exist for this user.
pub async fn update(
    pool: &PgPool,
    id: i64,
    user_id: i64,
    fields: &RecipeFields,
) -> Result<Recipe, sqlx::Error> {
    sqlx::query_as::<_, Recipe>(
        "UPDATE recipes SET
             title = COALESCE($3, title),
             time_minutes = COALESCE($4, time_minutes),
             price = COALESCE($5, price),
             link = COALESCE($6, link),
             description = COALESCE($7, description),
             updated_at = now()
         WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(fields.title.as_deref())
    .bind(fields.time_minutes)
    .bind(fields.price)
    .bind(fields.link.as_deref())
    .bind(fields.description.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn set_image(
    pool: &PgPool,
    id: i64,
    user_id: i64,
    image: &str,
) -> Result<Recipe, sqlx::Error> {
    sqlx::query_as::<_, Recipe>(
        "UPDATE recipes SET image = $3, updated_at = now()
         WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(image)
    .fetch_one(pool)
    .await
}

/// Delete a recipe, returning the removed row so its image can be cleaned up.
pub async fn delete(
    pool: &PgPool,
    id: i64,
    user_id: i64,
) -> Result<Option<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>("DELETE FROM recipes WHERE id = $1 AND user_id = $2 RETURNING *")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}
