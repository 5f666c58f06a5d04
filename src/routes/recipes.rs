use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::recipes::RecipeFields;
use crate::error::{AppError, FieldErrors};
use crate::extract::JsonBody;
use crate::media;
use crate::models::{RecipeDetail, RecipeImage, RecipeSummary};
use crate::state::SharedState;
use crate::validation;

/// Raw recipe fields, type-checked in `validate`.
#[derive(Debug, Default, Deserialize)]
pub struct RecipePayload {
    #[serde(default, deserialize_with = "validation::present")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "validation::present")]
    pub time_minutes: Option<Value>,
    #[serde(default, deserialize_with = "validation::present")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "validation::present")]
    pub link: Option<Value>,
    #[serde(default, deserialize_with = "validation::present")]
    pub description: Option<Value>,
}

impl RecipePayload {
    pub fn validate(self, partial: bool) -> Result<RecipeFields, AppError> {
        let mut errors = FieldErrors::new();

        let title = validation::text(&mut errors, "title", self.title, Some(255), false);
        let time_minutes = validation::integer(&mut errors, "time_minutes", self.time_minutes);
        let price = validation::decimal(&mut errors, "price", self.price, 5, 2);
        let link = validation::text(&mut errors, "link", self.link, Some(255), true);
        let description = validation::text(&mut errors, "description", self.description, None, true);

        validation::require(&mut errors, "title", &title, !partial);
        validation::require(&mut errors, "time_minutes", &time_minutes, !partial);
        validation::require(&mut errors, "price", &price, !partial);
        errors.into_result()?;

        Ok(RecipeFields {
            title,
            time_minutes,
            price,
            link,
            description,
        })
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Recipe not found".to_string())
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<RecipeSummary>>, AppError> {
    let recipes = db::recipes::list(&state.pool, auth.user_id()).await?;
    Ok(Json(recipes.iter().map(RecipeSummary::from).collect()))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<RecipePayload>,
) -> Result<(StatusCode, Json<RecipeDetail>), AppError> {
    let fields = req.validate(false)?;
    let (Some(title), Some(time_minutes), Some(price)) =
        (fields.title, fields.time_minutes, fields.price)
    else {
        return Err(AppError::Internal("validated recipe is missing fields".to_string()));
    };

    let recipe = db::recipes::create(
        &state.pool,
        auth.user_id(),
        &title,
        time_minutes,
        price,
        fields.link.as_deref().unwrap_or_default(),
        fields.description.as_deref().unwrap_or_default(),
    )
    .await?;
    tracing::info!(user_id = auth.user_id(), recipe_id = recipe.id, "Recipe created: {recipe}");

    Ok((StatusCode::CREATED, Json(recipe.into())))
}

pub async fn retrieve(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeDetail>, AppError> {
    let recipe = db::recipes::find_by_id(&state.pool, id, auth.user_id())
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(recipe.into()))
}

pub async fn update(
    auth: AuthUser,
    state: State<SharedState>,
    path: Path<i64>,
    body: JsonBody<RecipePayload>,
) -> Result<Json<RecipeDetail>, AppError> {
    save(auth, state, path, body, false).await
}

pub async fn partial_update(
    auth: AuthUser,
    state: State<SharedState>,
    path: Path<i64>,
    body: JsonBody<RecipePayload>,
) -> Result<Json<RecipeDetail>, AppError> {
    save(auth, state, path, body, true).await
}

async fn save(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<RecipePayload>,
    partial: bool,
) -> Result<Json<RecipeDetail>, AppError> {
    let fields = req.validate(partial)?;

    let recipe = db::recipes::update(&state.pool, id, auth.user_id(), &fields)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => not_found(),
            _ => AppError::Database(e),
        })?;
    tracing::info!(user_id = auth.user_id(), recipe_id = recipe.id, "Recipe updated");

    Ok(Json(recipe.into()))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let recipe = db::recipes::delete(&state.pool, id, auth.user_id())
        .await?
        .ok_or_else(not_found)?;

    if let Some(image) = &recipe.image {
        media::remove(&state.config.media_root, image).await;
    }
    tracing::info!(user_id = auth.user_id(), recipe_id = id, "Recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn upload_image(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RecipeImage>, AppError> {
    let existing = db::recipes::find_by_id(&state.pool, id, auth.user_id())
        .await?
        .ok_or_else(not_found)?;

    let upload = read_image_field(&headers, body).await?;
    if !media::is_image_filename(&upload.filename) {
        return Err(FieldErrors::single(
            "image",
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        )
        .into());
    }

    let relative = media::recipe_image_file_path(&upload.filename);
    media::save(&state.config.media_root, &relative, &upload.data)
        .await
        .map_err(AppError::Internal)?;

    let recipe = match db::recipes::set_image(&state.pool, id, auth.user_id(), &relative).await {
        Ok(recipe) => recipe,
        Err(e) => {
            media::remove(&state.config.media_root, &relative).await;
            return Err(match e {
                sqlx::Error::RowNotFound => not_found(),
                _ => AppError::Database(e),
            });
        }
    };

    if let Some(old) = existing.image.as_deref() {
        media::remove(&state.config.media_root, old).await;
    }
    tracing::info!(user_id = auth.user_id(), recipe_id = id, path = %relative, "Recipe image uploaded");

    Ok(Json(recipe.into()))
}

struct ImageUpload {
    filename: String,
    data: Bytes,
}

/// Pull the `image` file field out of a multipart body.
async fn read_image_field(headers: &HeaderMap, body: Bytes) -> Result<ImageUpload, AppError> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| AppError::BadRequest("Expected a multipart/form-data body".to_string()))?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            return Err(FieldErrors::single(
                "image",
                "The submitted data was not a file. Check the encoding type on the form.",
            )
            .into());
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Field read error: {e}")))?;
        if data.is_empty() {
            return Err(FieldErrors::single("image", "The submitted file is empty.").into());
        }
        return Ok(ImageUpload { filename, data });
    }

    Err(FieldErrors::single("image", "No file was submitted.").into())
}
