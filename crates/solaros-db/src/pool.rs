use crate::error::DbResult;
use sqlx::{Any, Pool, any::AnyPoolOptions};

/// Create a database pool from a connection string
///
/// Callers must have installed the `Any` drivers first
/// (`sqlx::any::install_default_drivers`).
pub async fn create_pool(database_url: &str, max_connections: u32) -> DbResult<Pool<Any>> {
    let pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Create the local tables the webhook handlers write to
///
/// Only meant for SQLite development and test databases; a hosted
/// PostgreSQL schema is managed outside this service.
pub async fn run_migrations(pool: &Pool<Any>) -> DbResult<()> {
    sqlx::raw_sql(include_str!("../migrations/001_initial.sql"))
        .execute(pool)
        .await?;

    Ok(())
}
