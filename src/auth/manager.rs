//! Account creation and credential checks.

use std::sync::LazyLock;

use sqlx::PgPool;

use crate::auth::password;
use crate::db;
use crate::error::{AppError, FieldErrors};
use crate::models::User;

/// Hash checked when the email is unknown, so the miss costs the same argon2 work.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    password::hash("recipe-api-unknown-user").unwrap_or_else(|e| {
        tracing::error!("Failed to build dummy password hash: {e}");
        String::new()
    })
});

/// Lower-case the domain part of an email, leaving the local part untouched.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Optional attributes for a new account.
#[derive(Debug, Clone, Default)]
pub struct UserExtra {
    pub name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Create an active user with a hashed password.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password: &str,
    extra: UserExtra,
) -> Result<User, AppError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(FieldErrors::single("email", "Users must have an email address.").into());
    }

    let pw_hash = password::hash_blocking(password.to_string())
        .await
        .map_err(AppError::Internal)?;

    let user = db::users::create(
        pool,
        &email,
        &pw_hash,
        &extra.name,
        true,
        extra.is_staff,
        extra.is_superuser,
    )
    .await
    .map_err(map_unique_email)?;

    tracing::info!(user_id = user.id, "Created user {}", user.email);
    Ok(user)
}

pub async fn create_superuser(pool: &PgPool, email: &str, password: &str) -> Result<User, AppError> {
    create_user(
        pool,
        email,
        password,
        UserExtra {
            is_staff: true,
            is_superuser: true,
            ..UserExtra::default()
        },
    )
    .await
}

/// Check credentials. `None` covers unknown email, wrong password and
/// inactive accounts alike.
pub async fn authenticate(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let Some(user) = db::users::find_by_email(pool, &normalize_email(email)).await? else {
        let candidate = password.to_string();
        let _ = tokio::task::spawn_blocking(move || password::verify(&candidate, &DUMMY_HASH)).await;
        return Ok(None);
    };

    let valid = password::verify_blocking(password.to_string(), user.password_hash.clone())
        .await
        .map_err(AppError::Internal)?;

    if !valid || !user.is_active {
        return Ok(None);
    }
    Ok(Some(user))
}

/// Turn a unique violation on `users.email` into a field error.
pub fn map_unique_email(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            FieldErrors::single("email", "user with this email already exists.").into()
        }
        _ => AppError::Database(err),
    }
}

/// Create the configured superuser unless the email is already taken.
pub async fn ensure_superuser(pool: &PgPool, email: &str, password: &str) -> Result<(), AppError> {
    if db::users::find_by_email(pool, &normalize_email(email))
        .await?
        .is_some()
    {
        tracing::debug!("Superuser {email} already exists");
        return Ok(());
    }
    let user = create_superuser(pool, email, password).await?;
    tracing::info!(user_id = user.id, "Bootstrapped superuser");
    Ok(())
}
