use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::token;
use crate::db;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;

/// The user resolved from an `Authorization: Token <key>` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    /// Hash of the presented token, so it can be revoked on logout.
    pub token_hash: String,
}

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication credentials were not provided.".to_string())
            })?
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        let key = token::from_authorization(header)
            .ok_or_else(|| AppError::Unauthorized("Invalid token header".to_string()))?;

        let token_hash = token::hash(key);
        let user = db::tokens::find_user(&state.pool, &token_hash)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid token.".to_string()))?;

        if !user.is_active {
            return Err(AppError::Unauthorized(
                "User inactive or deleted.".to_string(),
            ));
        }

        Ok(AuthUser { user, token_hash })
    }
}
