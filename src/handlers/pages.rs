//! Static pages and the fallbacks that need no data of their own.

use axum::{extract::State, http::StatusCode, response::Response};

use super::{render, template_data};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthState;
use crate::session::AppSession;
use crate::state::AppState;

pub async fn about(
    State(state): State<AppState>,
    session: AppSession,
    auth: AuthState,
) -> AppResult<Response> {
    let data = template_data(&session, auth).await?;
    render(&state, StatusCode::OK, "about.html", &data)
}

/// Liveness check for load balancers.
///
/// ## Route
/// GET /ping
///
/// Sits outside the session layer, so it never creates a session.
pub async fn ping() -> &'static str {
    "OK"
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
