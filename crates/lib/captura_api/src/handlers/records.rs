//! Record store request handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::models::{
    CreateRecordResponse, ListRecordsQuery, RecordListResponse, RecordResponse,
    SaveRecordRequest, SuccessResponse,
};
use crate::services::records;

/// `GET /records` — paginated, optionally filtered listing.
pub async fn list_records_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListRecordsQuery>,
) -> AppResult<Json<RecordListResponse>> {
    let resp = records::list(&state.pool, &user.id, &query).await?;
    Ok(Json(resp))
}

/// `POST /records` — save a new record.
pub async fn create_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<SaveRecordRequest>,
) -> AppResult<(StatusCode, Json<CreateRecordResponse>)> {
    let resp = records::create(&state.pool, &user.id, &body).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `GET /records/{id}` — fetch one owned record.
pub async fn get_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RecordResponse>> {
    let resp = records::get(&state.pool, &user.id, &id).await?;
    Ok(Json(resp))
}

/// `PUT /records/{id}` — update one owned record.
pub async fn update_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<SaveRecordRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let resp = records::update(&state.pool, &user.id, &id, &body).await?;
    Ok(Json(resp))
}

/// `DELETE /records/{id}` — delete one owned record.
pub async fn delete_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse>> {
    let resp = records::delete(&state.pool, &user.id, &id).await?;
    Ok(Json(resp))
}
