//! Authentication state for the current request.
//!
//! [`authenticate`] runs on every dynamic route: it turns the session's
//! claimed user id into an [`AuthState`] extension, but only after checking
//! the account still exists. [`require_auth`] then guards the routes that
//! need a logged-in user.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::convert::Infallible;

use crate::db::users;
use crate::error::AppError;
use crate::session::{AppSession, AUTHENTICATED_USER_ID_KEY, REDIRECT_PATH_KEY};
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/user/login";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(i64),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            AuthState::Authenticated(id) => Some(*id),
            AuthState::Anonymous => None,
        }
    }
}

/// Reads the state left by [`authenticate`]; anonymous if it never ran.
impl<S> FromRequestParts<S> for AuthState
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<AuthState>().copied().unwrap_or_default())
    }
}

pub async fn authenticate(
    State(state): State<AppState>,
    session: AppSession,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = match session.get::<i64>(AUTHENTICATED_USER_ID_KEY).await? {
        None => AuthState::Anonymous,
        Some(user_id) if users::exists(&state.db, user_id).await? => {
            AuthState::Authenticated(user_id)
        }
        Some(user_id) => {
            tracing::warn!(user_id, "session refers to a deleted user, treating as anonymous");
            session.remove(AUTHENTICATED_USER_ID_KEY).await?;
            AuthState::Anonymous
        }
    };

    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}

/// Sends anonymous visitors to the login page, remembering where they were
/// going. Pages behind it are never stored by caches.
pub async fn require_auth(
    auth: AuthState,
    session: AppSession,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !auth.is_authenticated() {
        session
            .put(REDIRECT_PATH_KEY, request.uri().path())
            .await?;
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}
