//! # captura_api
//!
//! HTTP API library for Captura.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use captura_core::ocr::OcrEngine;

use crate::config::ApiConfig;
use crate::handlers::{auth, profile, records, upload};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
    /// Black-box recognition engine for uploaded images.
    pub ocr: Arc<dyn OcrEngine>,
}

/// Run embedded database migrations.
///
/// Delegates to `captura_core::migrate::migrate()` which owns the
/// migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    captura_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/refresh", post(auth::refresh_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (require a valid access token)
    let protected = Router::new()
        .route("/auth/me", get(profile::me_handler))
        .route(
            "/auth/profile",
            get(profile::get_profile_handler)
                .put(profile::update_profile_handler)
                .delete(profile::delete_account_handler),
        )
        .route(
            "/records",
            get(records::list_records_handler).post(records::create_record_handler),
        )
        .route("/records/upload", post(upload::upload_handler))
        .route(
            "/records/{id}",
            get(records::get_record_handler)
                .put(records::update_record_handler)
                .delete(records::delete_record_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
