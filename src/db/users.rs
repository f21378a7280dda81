//! # User Queries
//!
//! Emails are unique, enforced by the schema and reported as
//! [`AppError::DuplicateEmail`]. Passwords only ever reach the database as
//! argon2 hashes.

use crate::db::models::{UserCredentials, UserProfile};
use crate::error::{AppError, AppResult};
use crate::password;
use chrono::Utc;
use sqlx::SqlitePool;

/// Registers a user and returns the new id.
///
/// An email that is already taken comes back as [`AppError::DuplicateEmail`].
pub async fn insert(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    hashed_password: &str,
) -> AppResult<i64> {
    let result = sqlx::query(
        "INSERT INTO users (name, email, hashed_password, created)
         VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(email)
    .bind(hashed_password)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::DuplicateEmail
        }
        _ => AppError::Database(e),
    })?;

    Ok(result.last_insert_rowid())
}

/// Checks an email/password pair and returns the user's id.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate(pool: &SqlitePool, email: &str, plain: &str) -> AppResult<i64> {
    let credentials = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, hashed_password FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::InvalidCredentials)?;

    if password::verify(plain.to_string(), credentials.hashed_password).await? {
        Ok(credentials.id)
    } else {
        Err(AppError::InvalidCredentials)
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<UserProfile> {
    let user = sqlx::query_as::<_, UserProfile>(
        "SELECT name, email, created FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound,
        _ => AppError::Database(e),
    })?;

    Ok(user)
}

/// Whether an account with this id still exists.
pub async fn exists(pool: &SqlitePool, id: i64) -> AppResult<bool> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(found)
}

pub async fn password_hash(pool: &SqlitePool, id: i64) -> AppResult<String> {
    sqlx::query_scalar("SELECT hashed_password FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn update_password(pool: &SqlitePool, id: i64, hashed_password: &str) -> AppResult<()> {
    let result = sqlx::query("UPDATE users SET hashed_password = ? WHERE id = ?")
        .bind(hashed_password)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(())
}
