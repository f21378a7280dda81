//! # Database Models
//!
//! Row types for the `snippets` and `users` tables. Timestamps are stored as
//! RFC 3339 text and surface as `DateTime<Utc>`.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored snippet
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    /// After this instant the snippet is treated as if it never existed
    pub expires: DateTime<Utc>,
}

/// What the account page shows about the logged-in user
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub created: DateTime<Utc>,
}

/// The pair needed to check a login attempt
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub hashed_password: String,
}
