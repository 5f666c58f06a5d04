use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::extractor::AuthUser;
use crate::auth::manager::{self, UserExtra};
use crate::auth::{password, token};
use crate::db;
use crate::error::{AppError, FieldErrors, NON_FIELD_ERRORS};
use crate::extract::JsonBody;
use crate::models::UserProfile;
use crate::state::SharedState;
use crate::validation;

pub const MIN_PASSWORD_LENGTH: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default, deserialize_with = "validation::present")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "validation::present")]
    pub password: Option<Value>,
    #[serde(default, deserialize_with = "validation::present")]
    pub name: Option<Value>,
}

/// Validated user fields; each is `None` when a partial update omitted it.
#[derive(Debug, Default)]
pub struct UserFields {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

impl UserPayload {
    pub fn validate(self, require_password: bool, partial: bool) -> Result<UserFields, AppError> {
        let mut errors = FieldErrors::new();

        let email = validation::email(&mut errors, "email", self.email);
        let name = validation::text(&mut errors, "name", self.name, Some(255), false);
        let password = match validation::string(&mut errors, "password", self.password) {
            Some(p) if p.is_empty() => {
                errors.add("password", validation::BLANK);
                None
            }
            Some(p) => validation::min_length(&mut errors, "password", &p, MIN_PASSWORD_LENGTH)
                .then_some(p),
            None => None,
        };

        validation::require(&mut errors, "email", &email, !partial);
        validation::require(&mut errors, "name", &name, !partial);
        validation::require(&mut errors, "password", &password, require_password);
        errors.into_result()?;

        Ok(UserFields {
            email,
            password,
            name,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    #[serde(default, deserialize_with = "validation::present")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "validation::present")]
    pub password: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn create(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<UserPayload>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let fields = req.validate(true, false)?;
    let (Some(email), Some(password)) = (fields.email, fields.password) else {
        return Err(AppError::Internal("validated user is missing fields".to_string()));
    };

    let user = manager::create_user(
        &state.pool,
        &email,
        &password,
        UserExtra {
            name: fields.name.unwrap_or_default(),
            ..UserExtra::default()
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn token(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let mut errors = FieldErrors::new();
    let email = validation::text(&mut errors, "email", req.email, None, false);
    let password = match validation::string(&mut errors, "password", req.password) {
        Some(p) if p.is_empty() => {
            errors.add("password", validation::BLANK);
            None
        }
        other => other,
    };
    validation::require(&mut errors, "email", &email, true);
    validation::require(&mut errors, "password", &password, true);
    errors.into_result()?;
    let (Some(email), Some(password)) = (email, password) else {
        return Err(AppError::Internal("validated credentials are missing".to_string()));
    };

    let email = manager::normalize_email(&email);
    if let Err(retry_after) = state.login_limiter.try_attempt(&email) {
        tracing::debug!(retry_after, "Token request throttled for {email}");
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let Some(user) = manager::authenticate(&state.pool, &email, &password).await? else {
        tracing::debug!("Token request rejected for {email}");
        return Err(FieldErrors::single(
            NON_FIELD_ERRORS,
            "Unable to authenticate with provided credentials.",
        )
        .into());
    };
    state.login_limiter.reset(&email);

    let key = token::generate();
    db::tokens::create(&state.pool, user.id, &token::hash(&key)).await?;
    tracing::info!(user_id = user.id, "Issued API token");

    Ok(Json(TokenResponse { token: key }))
}

pub async fn logout(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<StatusCode, AppError> {
    db::tokens::delete_by_hash(&state.pool, &auth.token_hash).await?;
    tracing::info!(user_id = auth.user_id(), "API token revoked");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(auth: AuthUser) -> Json<UserProfile> {
    Json(auth.user.into())
}

pub async fn update_me(
    auth: AuthUser,
    state: State<SharedState>,
    body: JsonBody<UserPayload>,
) -> Result<Json<UserProfile>, AppError> {
    save_me(auth, state, body, false).await
}

pub async fn partial_update_me(
    auth: AuthUser,
    state: State<SharedState>,
    body: JsonBody<UserPayload>,
) -> Result<Json<UserProfile>, AppError> {
    save_me(auth, state, body, true).await
}

async fn save_me(
    auth: AuthUser,
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<UserPayload>,
    partial: bool,
) -> Result<Json<UserProfile>, AppError> {
    let fields = req.validate(false, partial)?;

    let email = fields.email.as_deref().map(manager::normalize_email);
    let pw_hash = match fields.password {
        Some(p) => Some(password::hash_blocking(p).await.map_err(AppError::Internal)?),
        None => None,
    };

    let user = db::users::update_profile(
        &state.pool,
        auth.user_id(),
        email.as_deref(),
        fields.name.as_deref(),
        pw_hash.as_deref(),
    )
    .await
    .map_err(manager::map_unique_email)?;
    tracing::info!(user_id = user.id, "User profile updated");

    Ok(Json(user.into()))
}
