//! Auth-related database queries.
//!
//! Session tokens are stored hashed; lookups and deletions go through the
//! hash, so the plaintext refresh token never reaches the database.

use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::User;
use crate::ids::new_row_id;

/// Fetch a user by email, returning (id, name, password_hash).
pub async fn find_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<(Uuid, String, String)>, AuthError> {
    let row = sqlx::query_as::<_, (Uuid, String, String)>(
        "SELECT id, name, password_hash FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Check whether an email is already registered.
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, AuthError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Create a new user, returning the user ID.
pub async fn create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<Uuid, AuthError> {
    let user_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;
    Ok(user_id)
}

/// Fetch user name and email by ID.
pub async fn get_user_by_id(pool: &PgPool, user_id: &Uuid) -> Result<Option<User>, AuthError> {
    let row =
        sqlx::query_as::<_, (String, String)>("SELECT name, email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(name, email)| User {
        id: *user_id,
        name,
        email,
    }))
}

/// Fetch the stored password hash for a user.
pub async fn get_password_hash(
    pool: &PgPool,
    user_id: &Uuid,
) -> Result<Option<String>, AuthError> {
    let hash =
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(hash)
}

/// Update a user's display name.
pub async fn update_user_name(
    pool: &PgPool,
    user_id: &Uuid,
    name: &str,
) -> Result<bool, AuthError> {
    let result = sqlx::query("UPDATE users SET name = $1 WHERE id = $2")
        .bind(name)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Replace a user's password hash.
pub async fn update_user_password(
    pool: &PgPool,
    user_id: &Uuid,
    password_hash: &str,
) -> Result<bool, AuthError> {
    let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a user. Session tokens and OCR records cascade at the schema
/// level.
pub async fn delete_user(pool: &PgPool, user_id: &Uuid) -> Result<bool, AuthError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Persist a session token hash for a user.
pub async fn store_session_token(
    pool: &PgPool,
    user_id: &Uuid,
    token_hash: &str,
) -> Result<(), AuthError> {
    sqlx::query("INSERT INTO session_tokens (id, user_id, token_hash) VALUES ($1, $2, $3)")
        .bind(new_row_id())
        .bind(user_id)
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(())
}

/// Check whether a session token hash is still in the persisted set.
pub async fn session_token_exists(pool: &PgPool, token_hash: &str) -> Result<bool, AuthError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM session_tokens WHERE token_hash = $1)",
    )
    .bind(token_hash)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Delete a session token by hash. Returns false when no row matched, so
/// a second logout with the same token is observable.
pub async fn delete_session_token(pool: &PgPool, token_hash: &str) -> Result<bool, AuthError> {
    let result = sqlx::query("DELETE FROM session_tokens WHERE token_hash = $1")
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
