//! Story store database schema.

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};

/// Embedded migrations from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// SQL to drop the story tables and the migration bookkeeping table.
///
/// Children are dropped before their parents.
pub const DROP_STORY_TABLES: &str = r"
DROP TABLE IF EXISTS choices;
DROP TABLE IF EXISTS pages;
DROP TABLE IF EXISTS stories;
DROP TABLE IF EXISTS _sqlx_migrations;
";

/// Creates the story tables if they do not exist yet.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails to apply.
pub async fn create_schema(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("story schema is up to date");
    Ok(())
}

/// Drops every story table and recreates the schema. All stories are lost.
///
/// # Errors
///
/// Returns `MigrateError` if dropping the tables or re-running the
/// migrations fails.
pub async fn reset_schema(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::raw_sql(DROP_STORY_TABLES).execute(pool).await?;
    tracing::warn!("dropped story tables");
    create_schema(pool).await
}
