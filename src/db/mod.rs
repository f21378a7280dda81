//! # Database Module
//!
//! Snippet and user storage on SQLite:
//! - `models`: row types
//! - `snippets`: create/read snippets, honouring their expiry
//! - `users`: accounts, credentials and identity checks
//!
//! Sessions live in the same database but are owned by the session store.

pub mod models;
pub mod snippets;
pub mod users;

use sqlx::sqlite::SqlitePool;

/// Connects to the database and brings the schema up to date.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(database_url).await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Runs the embedded migrations from `./migrations`.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
