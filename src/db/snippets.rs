//! # Snippet Queries
//!
//! Timestamps are stored in UTC. A snippet past its `expires` time is never
//! returned: [`get`] treats it as missing and [`latest`] skips it. Rows are
//! not deleted when they expire.

use crate::db::models::Snippet;
use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;

/// How many snippets the home page lists
pub const LATEST_LIMIT: i64 = 10;

/// Stores a snippet that expires `expires_days` from now and returns its id.
pub async fn insert(
    pool: &SqlitePool,
    title: &str,
    content: &str,
    expires_days: i64,
) -> AppResult<i64> {
    let created = Utc::now();
    let expires = created + Duration::days(expires_days);

    let result = sqlx::query(
        "INSERT INTO snippets (title, content, created, expires)
         VALUES (?, ?, ?, ?)",
    )
    .bind(title)
    .bind(content)
    .bind(created)
    .bind(expires)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Fetches a snippet unless it doesn't exist or has expired.
pub async fn get(pool: &SqlitePool, id: i64) -> AppResult<Snippet> {
    let snippet = sqlx::query_as::<_, Snippet>(
        "SELECT id, title, content, created, expires FROM snippets
         WHERE id = ? AND expires > ?",
    )
    .bind(id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound,
        _ => AppError::Database(e),
    })?;

    Ok(snippet)
}

/// The most recently created snippets that are still live, newest first.
pub async fn latest(pool: &SqlitePool) -> AppResult<Vec<Snippet>> {
    let snippets = sqlx::query_as::<_, Snippet>(
        "SELECT id, title, content, created, expires FROM snippets
         WHERE expires > ?
         ORDER BY id DESC
         LIMIT ?",
    )
    .bind(Utc::now())
    .bind(LATEST_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(snippets)
}
