//! Bearer-token middleware guarding protected routes.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use captura_core::auth::jwt::verify_token;
use captura_core::models::auth::TokenClaims;

use crate::AppState;
use crate::error::AppError;

/// Identity decoded from the access token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

impl CurrentUser {
    fn from_claims(claims: &TokenClaims) -> Option<Self> {
        let id = claims.sub.parse().ok()?;
        Some(Self {
            id,
            email: claims.email.clone(),
        })
    }
}

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the
/// access token, and injects [`CurrentUser`] into request extensions.
///
/// Stateless — only the signature and expiry are checked; the persisted
/// token set is consulted exclusively by `refresh` and `logout`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;

    let claims = verify_token(token, state.config.access_token_secret.as_bytes())
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user = CurrentUser::from_claims(&claims)
        .ok_or_else(|| AppError::Unauthorized("Invalid token subject".into()))?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
