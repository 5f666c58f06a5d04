//! Handlers shared by tags and ingredients, instantiated per type in the router.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::{AppError, FieldErrors};
use crate::extract::JsonBody;
use crate::models::RecipeAttribute;
use crate::state::SharedState;
use crate::validation;

#[derive(Debug, Default, Deserialize)]
pub struct AttributePayload {
    #[serde(default, deserialize_with = "validation::present")]
    pub name: Option<Value>,
}

impl AttributePayload {
    /// Validated name. `None` only for a partial update that omitted it.
    pub fn validate(self, partial: bool) -> Result<Option<String>, AppError> {
        let mut errors = FieldErrors::new();
        let name = validation::text(&mut errors, "name", self.name, Some(255), false);
        validation::require(&mut errors, "name", &name, !partial);
        errors.into_result()?;
        Ok(name)
    }
}

fn not_found<T: RecipeAttribute>() -> AppError {
    AppError::NotFound(format!("{} not found", T::LABEL))
}

pub async fn list<T: RecipeAttribute>(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<T>>, AppError> {
    let rows = db::attributes::list::<T>(&state.pool, auth.user_id()).await?;
    Ok(Json(rows))
}

pub async fn create<T: RecipeAttribute>(
    auth: AuthUser,
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<AttributePayload>,
) -> Result<(StatusCode, Json<T>), AppError> {
    let name = req
        .validate(false)?
        .ok_or_else(|| FieldErrors::single("name", validation::REQUIRED))?;

    let row = db::attributes::create::<T>(&state.pool, auth.user_id(), &name).await?;
    tracing::info!(user_id = auth.user_id(), id = row.id(), "{} created", T::LABEL);

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn retrieve<T: RecipeAttribute>(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<T>, AppError> {
    let row = db::attributes::find_by_id::<T>(&state.pool, id, auth.user_id())
        .await?
        .ok_or_else(not_found::<T>)?;
    Ok(Json(row))
}

pub async fn update<T: RecipeAttribute>(
    auth: AuthUser,
    state: State<SharedState>,
    path: Path<i64>,
    body: JsonBody<AttributePayload>,
) -> Result<Json<T>, AppError> {
    save::<T>(auth, state, path, body, false).await
}

pub async fn partial_update<T: RecipeAttribute>(
    auth: AuthUser,
    state: State<SharedState>,
    path: Path<i64>,
    body: JsonBody<AttributePayload>,
) -> Result<Json<T>, AppError> {
    save::<T>(auth, state, path, body, true).await
}

async fn save<T: RecipeAttribute>(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<AttributePayload>,
    partial: bool,
) -> Result<Json<T>, AppError> {
    let Some(name) = req.validate(partial)? else {
        return retrieve::<T>(auth, State(state), Path(id)).await;
    };

    let row = db::attributes::update::<T>(&state.pool, id, auth.user_id(), &name)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => not_found::<T>(),
            _ => AppError::Database(e),
        })?;
    tracing::info!(user_id = auth.user_id(), id, "{} updated", T::LABEL);

    Ok(Json(row))
}

pub async fn delete<T: RecipeAttribute>(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !db::attributes::delete::<T>(&state.pool, id, auth.user_id()).await? {
        return Err(not_found::<T>());
    }
    tracing::info!(user_id = auth.user_id(), id, "{} deleted", T::LABEL);
    Ok(StatusCode::NO_CONTENT)
}
