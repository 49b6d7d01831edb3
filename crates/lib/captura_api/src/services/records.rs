//! Record store service — validation and wire mapping over
//! `captura_core::records`.

use sqlx::PgPool;
use uuid::Uuid;

use captura_core::records::{self, OcrRecordRow};

use crate::error::{AppError, AppResult};
use crate::models::{
    CreateRecordResponse, ListRecordsQuery, RecordListResponse, RecordResponse, SaveRecordRequest,
    SuccessResponse,
};

/// Default page size when the client sends none.
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page a client may request.
const MAX_PAGE_SIZE: i64 = 100;

/// Longest accepted title.
const MAX_TITLE_LEN: usize = 100;

fn to_response(row: OcrRecordRow) -> RecordResponse {
    RecordResponse {
        id: row.id.to_string(),
        title: row.title,
        content: row.content,
        comment: row.comment,
        created_at: row.created_at.to_rfc3339(),
    }
}

fn validate(body: &SaveRecordRequest) -> AppResult<()> {
    if body.title.trim().is_empty() || body.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and content are required".into(),
        ));
    }
    if body.title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// List records for a user, newest first. Pages are 1-based; the search
/// term is trimmed and an empty one means no filter.
pub async fn list(
    pool: &PgPool,
    user_id: &Uuid,
    query: &ListRecordsQuery,
) -> AppResult<RecordListResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1).saturating_mul(limit);
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty());

    let (rows, total) = records::list_records(pool, user_id, search, limit, offset).await?;

    Ok(RecordListResponse {
        records: rows.into_iter().map(to_response).collect(),
        total,
        page,
        limit,
    })
}

/// Create a record, returning its fresh identifier.
pub async fn create(
    pool: &PgPool,
    user_id: &Uuid,
    body: &SaveRecordRequest,
) -> AppResult<CreateRecordResponse> {
    validate(body)?;
    let row = records::create_record(
        pool,
        user_id,
        &body.title,
        &body.content,
        body.comment.as_deref(),
    )
    .await?;
    Ok(CreateRecordResponse {
        id: row.id.to_string(),
    })
}

/// Fetch one record. Absent and not-owned are indistinguishable by design.
pub async fn get(pool: &PgPool, user_id: &Uuid, record_id: &Uuid) -> AppResult<RecordResponse> {
    let row = records::get_record(pool, user_id, record_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Record not found".into()))?;
    Ok(to_response(row))
}

/// Update one record under the same ownership condition as [`get`].
pub async fn update(
    pool: &PgPool,
    user_id: &Uuid,
    record_id: &Uuid,
    body: &SaveRecordRequest,
) -> AppResult<SuccessResponse> {
    validate(body)?;
    records::update_record(
        pool,
        user_id,
        record_id,
        &body.title,
        &body.content,
        body.comment.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Record not found".into()))?;
    Ok(SuccessResponse { success: true })
}

/// Delete one record under the same ownership condition as [`get`].
pub async fn delete(
    pool: &PgPool,
    user_id: &Uuid,
    record_id: &Uuid,
) -> AppResult<SuccessResponse> {
    if !records::delete_record(pool, user_id, record_id).await? {
        return Err(AppError::NotFound("Record not found".into()));
    }
    Ok(SuccessResponse { success: true })
}
