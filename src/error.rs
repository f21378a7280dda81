//! # Error Handling
//!
//! One application-wide error type and its conversion into HTTP responses.
//!
//! Client errors (malformed forms, unknown ids) map to a fixed 4xx status and
//! are only logged at debug level. Everything else is a server fault: it is
//! logged with full detail and a backtrace, and the client only ever sees the
//! canonical reason phrase.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::backtrace::Backtrace;
use thiserror::Error;

use crate::forms::FormError;
use crate::templates::TemplateError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors (SQLx library errors)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session store failures (load, save or (de)serialization of a value)
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template lookup or execution failures
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Password hashing or verification could not run
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// A form type that cannot be decoded into at all. This is a defect in
    /// the calling code, never the request's fault.
    #[error("Invalid form decode target: {0}")]
    FormTarget(String),

    /// Malformed request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or expired resource (404)
    #[error("Not found")]
    NotFound,

    /// Email/password pair did not match a user. Deliberately carries no
    /// detail about which half was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signup with an email that is already registered
    #[error("Duplicate email")]
    DuplicateEmail,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::Database(_)
            | AppError::Session(_)
            | AppError::Template(_)
            | AppError::PasswordHash(_)
            | AppError::FormTarget(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_fault(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Malformed(reason) => AppError::BadRequest(reason),
            FormError::InvalidTarget(reason) => AppError::FormTarget(reason),
        }
    }
}

/// Convert AppError into an HTTP response
///
/// The body is always the bare reason phrase for the status code; the
/// detailed error only goes to the log.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_fault() {
            tracing::error!(
                error = ?self,
                backtrace = %Backtrace::force_capture(),
                "{}",
                self
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "client error");
        }

        (status, status.canonical_reason().unwrap_or("Error")).into_response()
    }
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
