//! OCR record persistence.
//!
//! Every query carries the owner in its predicate; an id alone never
//! reaches the database without its `user_id` companion.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::ids::new_row_id;

/// Row returned by record queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OcrRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Escape `\`, `%` and `_` so a search term matches literally under ILIKE.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// List records for a user, newest first, with offset/limit pagination.
///
/// A search term filters to case-insensitive substring matches on title or
/// content. Returns the page plus the filtered pre-pagination count.
pub async fn list_records(
    pool: &PgPool,
    user_id: &Uuid,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<OcrRecordRow>, i64), sqlx::Error> {
    let pattern = search.map(|term| format!("%{}%", escape_like(term)));

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM ocr_records
        WHERE user_id = $1
          AND ($2::text IS NULL OR title ILIKE $2 OR content ILIKE $2)
        "#,
    )
    .bind(user_id)
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    // Secondary id ordering keeps pages stable when created_at ties;
    // record ids are UUIDv7, so it follows creation order.
    let rows = sqlx::query_as::<_, OcrRecordRow>(
        r#"
        SELECT id, user_id, title, content, comment, created_at
        FROM ocr_records
        WHERE user_id = $1
          AND ($2::text IS NULL OR title ILIKE $2 OR content ILIKE $2)
        ORDER BY created_at DESC, id DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(user_id)
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((rows, total))
}

/// Create a new record.
pub async fn create_record(
    pool: &PgPool,
    user_id: &Uuid,
    title: &str,
    content: &str,
    comment: Option<&str>,
) -> Result<OcrRecordRow, sqlx::Error> {
    sqlx::query_as::<_, OcrRecordRow>(
        r#"
        INSERT INTO ocr_records (id, user_id, title, content, comment)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, title, content, comment, created_at
        "#,
    )
    .bind(new_row_id())
    .bind(user_id)
    .bind(title)
    .bind(content)
    .bind(comment)
    .fetch_one(pool)
    .await
}

/// Get a record by ID, scoped to its owner.
pub async fn get_record(
    pool: &PgPool,
    user_id: &Uuid,
    record_id: &Uuid,
) -> Result<Option<OcrRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, OcrRecordRow>(
        r#"
        SELECT id, user_id, title, content, comment, created_at
        FROM ocr_records
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(record_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Update a record's title, content and comment, scoped to its owner.
/// Returns `None` when `(id, owner)` matched no row.
pub async fn update_record(
    pool: &PgPool,
    user_id: &Uuid,
    record_id: &Uuid,
    title: &str,
    content: &str,
    comment: Option<&str>,
) -> Result<Option<OcrRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, OcrRecordRow>(
        r#"
        UPDATE ocr_records
        SET title = $1, content = $2, comment = $3
        WHERE id = $4 AND user_id = $5
        RETURNING id, user_id, title, content, comment, created_at
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(comment)
    .bind(record_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Delete a record, scoped to its owner. Returns false when `(id, owner)`
/// matched no row.
pub async fn delete_record(
    pool: &PgPool,
    user_id: &Uuid,
    record_id: &Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ocr_records WHERE id = $1 AND user_id = $2")
        .bind(record_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
