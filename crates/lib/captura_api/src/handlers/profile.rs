//! Identity and profile request handlers.

use axum::{Extension, Json};
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::models::{IdentityResponse, ProfileResponse, SuccessResponse, UpdateProfileRequest};
use crate::services::auth;

/// `GET /auth/me` — identity behind the presented access token.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<IdentityResponse>> {
    let resp = auth::identity(&state.pool, &user.id).await?;
    Ok(Json(resp))
}

/// `GET /auth/profile` — profile of the authenticated user.
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<ProfileResponse>> {
    let resp = auth::get_profile(&state.pool, &user.id).await?;
    Ok(Json(resp))
}

/// `PUT /auth/profile` — update display name and/or password.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let resp = auth::update_profile(&state.pool, &user.id, &body).await?;
    Ok(Json(resp))
}

/// `DELETE /auth/profile` — delete the account; sessions and records
/// cascade.
pub async fn delete_account_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<SuccessResponse>> {
    let resp = auth::delete_account(&state.pool, &user.id).await?;
    Ok(Json(resp))
}
