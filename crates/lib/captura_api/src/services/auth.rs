//! Authentication service — session lifecycle and profile flows over
//! `captura_core::auth`.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use captura_core::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_token, verify_token,
};
use captura_core::auth::password::{hash_password, verify_password};
use captura_core::auth::queries;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    IdentityResponse, ProfileResponse, RefreshResponse, SuccessResponse, TokenPairResponse,
    UpdateProfileRequest,
};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Issue a fresh token pair and persist the refresh token's hash.
async fn issue_token_pair(
    pool: &PgPool,
    config: &ApiConfig,
    user_id: &Uuid,
    email: &str,
) -> AppResult<TokenPairResponse> {
    let subject = user_id.to_string();
    let access_token =
        generate_access_token(&subject, email, config.access_token_secret.as_bytes())?;
    let refresh_token =
        generate_refresh_token(&subject, email, config.refresh_token_secret.as_bytes())?;

    queries::store_session_token(pool, user_id, &hash_token(&refresh_token)).await?;

    Ok(TokenPairResponse {
        access_token,
        refresh_token,
    })
}

/// Register a new user account and start a session.
pub async fn register(
    pool: &PgPool,
    config: &ApiConfig,
    name: &str,
    email: &str,
    password: &str,
) -> AppResult<TokenPairResponse> {
    if name.trim().is_empty() || email.trim().is_empty() {
        return Err(AppError::Validation("Name and email are required".into()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if queries::email_exists(pool, email).await? {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let pw_hash = hash_password(password)?;
    let user_id = queries::create_user(pool, name, email, &pw_hash).await?;
    info!(%user_id, "user registered");

    issue_token_pair(pool, config, &user_id, email).await
}

/// Authenticate with email + password.
///
/// Unknown email and wrong password produce the same error, so the
/// endpoint leaks nothing about which addresses exist.
pub async fn login(
    pool: &PgPool,
    config: &ApiConfig,
    email: &str,
    password: &str,
) -> AppResult<TokenPairResponse> {
    let Some((user_id, _name, pw_hash)) = queries::find_user_by_email(pool, email).await? else {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };

    if !verify_password(password, &pw_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    issue_token_pair(pool, config, &user_id, email).await
}

/// Exchange a refresh token for a new access token.
///
/// The token must verify against the refresh secret AND still exist in the
/// persisted set — logout revokes it server-side regardless of its embedded
/// expiry. The refresh token itself is not rotated.
pub async fn refresh(
    pool: &PgPool,
    config: &ApiConfig,
    refresh_token: &str,
) -> AppResult<RefreshResponse> {
    let claims = verify_token(refresh_token, config.refresh_token_secret.as_bytes())
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired refresh token".into()))?;

    if !queries::session_token_exists(pool, &hash_token(refresh_token)).await? {
        return Err(AppError::Unauthorized("Refresh token has been revoked".into()));
    }

    let access_token = generate_access_token(
        &claims.sub,
        &claims.email,
        config.access_token_secret.as_bytes(),
    )?;

    Ok(RefreshResponse { access_token })
}

/// Logout — delete the persisted refresh token.
///
/// A token that is not in the set (never issued, or already logged out)
/// reports not-found rather than succeeding silently.
pub async fn logout(pool: &PgPool, refresh_token: &str) -> AppResult<SuccessResponse> {
    if !queries::delete_session_token(pool, &hash_token(refresh_token)).await? {
        return Err(AppError::NotFound("Unknown refresh token".into()));
    }
    Ok(SuccessResponse { success: true })
}

/// Identity behind an access token, freshly read from the store.
pub async fn identity(pool: &PgPool, user_id: &Uuid) -> AppResult<IdentityResponse> {
    let user = queries::get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(IdentityResponse {
        id: user.id.to_string(),
        name: user.name,
        email: user.email,
    })
}

/// Profile view for the authenticated user.
pub async fn get_profile(pool: &PgPool, user_id: &Uuid) -> AppResult<ProfileResponse> {
    let user = queries::get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(ProfileResponse {
        name: user.name,
        email: user.email,
    })
}

/// Update display name and/or password.
///
/// A password change requires the current password to verify; name and
/// password updates are independent of each other.
pub async fn update_profile(
    pool: &PgPool,
    user_id: &Uuid,
    update: &UpdateProfileRequest,
) -> AppResult<SuccessResponse> {
    if let (Some(current), Some(new)) = (&update.current_password, &update.new_password) {
        let stored = queries::get_password_hash(pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if !verify_password(current, &stored)? {
            return Err(AppError::Validation("Current password is incorrect".into()));
        }
        if new.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        queries::update_user_password(pool, user_id, &hash_password(new)?).await?;
        info!(%user_id, "password changed");
    }

    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Name must not be empty".into()));
        }
        queries::update_user_name(pool, user_id, name).await?;
    }

    Ok(SuccessResponse { success: true })
}

/// Delete the account. Sessions and records cascade at the schema level.
pub async fn delete_account(pool: &PgPool, user_id: &Uuid) -> AppResult<SuccessResponse> {
    if !queries::delete_user(pool, user_id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!(%user_id, "account deleted");
    Ok(SuccessResponse { success: true })
}
