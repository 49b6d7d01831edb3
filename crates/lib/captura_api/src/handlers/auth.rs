//! Authentication request handlers.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{
    LoginRequest, LogoutRequest, RefreshRequest, RefreshResponse, RegisterRequest,
    SuccessResponse, TokenPairResponse,
};
use crate::services::auth;

/// `POST /auth/register` — create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<TokenPairResponse>> {
    let resp = auth::register(
        &state.pool,
        &state.config,
        &body.name,
        &body.email,
        &body.password,
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /auth/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenPairResponse>> {
    let resp = auth::login(&state.pool, &state.config, &body.email, &body.password).await?;
    Ok(Json(resp))
}

/// `POST /auth/refresh` — exchange a refresh token for a new access token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let resp = auth::refresh(&state.pool, &state.config, &body.refresh_token).await?;
    Ok(Json(resp))
}

/// `POST /auth/logout` — delete a refresh token.
pub async fn logout_handler(
    State(state): State<AppState>,
    Json(body): Json<LogoutRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let resp = auth::logout(&state.pool, &body.refresh_token).await?;
    Ok(Json(resp))
}
