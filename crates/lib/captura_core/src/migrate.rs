//! Schema migrations.

use sqlx::PgPool;

/// Apply the migrations embedded from `captura_core/migrations/` that the
/// target database has not seen yet.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
