//! # User Handlers
//!
//! Signup, login/logout and the account pages.
//!
//! Every change of authentication state (login, logout) moves the session to
//! a new id before touching the user id stored in it.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use super::{render, template_data};
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::forms::{LoginForm, PasswordUpdateForm, PostForm, SignupForm};
use crate::middleware::auth::{AuthState, LOGIN_PATH};
use crate::password;
use crate::session::{AppSession, AUTHENTICATED_USER_ID_KEY, FLASH_KEY, REDIRECT_PATH_KEY};
use crate::state::AppState;
use crate::validator::Validated;

/// Where a login lands when nothing asked for a specific page
pub const DEFAULT_LANDING_PATH: &str = "/snippet/create";
const ACCOUNT_PATH: &str = "/account/view";
const DUPLICATE_EMAIL: &str = "Email address is already in use";

pub async fn signup(
    State(state): State<AppState>,
    session: AppSession,
    auth: AuthState,
) -> AppResult<Response> {
    let data = template_data(&session, auth)
        .await?
        .with_form(SignupForm::default());
    render(&state, StatusCode::OK, "signup.html", &data)
}

/// ## Route
/// POST /user/signup
///
/// A taken email is reported on the email field like any other validation
/// failure; nothing is stored.
pub async fn signup_post(
    State(state): State<AppState>,
    session: AppSession,
    auth: AuthState,
    PostForm(mut form): PostForm<SignupForm>,
) -> AppResult<Response> {
    form.validate();

    if form.is_valid() {
        let hashed = password::hash(form.password.clone()).await?;
        match users::insert(&state.db, &form.name, &form.email, &hashed).await {
            Ok(user_id) => {
                tracing::info!(user_id, "user signed up");
                session
                    .put(FLASH_KEY, "Your signup was successful. Please log in.")
                    .await?;
                return Ok(Redirect::to(LOGIN_PATH).into_response());
            }
            Err(AppError::DuplicateEmail) => form.add_field_error("email", DUPLICATE_EMAIL),
            Err(e) => return Err(e),
        }
    }

    let data = template_data(&session, auth).await?.with_form(form);
    render(&state, StatusCode::UNPROCESSABLE_ENTITY, "signup.html", &data)
}

pub async fn login(
    State(state): State<AppState>,
    session: AppSession,
    auth: AuthState,
) -> AppResult<Response> {
    let data = template_data(&session, auth)
        .await?
        .with_form(LoginForm::default());
    render(&state, StatusCode::OK, "login.html", &data)
}

/// ## Route
/// POST /user/login
///
/// On success the session id is renewed and the user is sent to the page
/// that bounced them here, or to [`DEFAULT_LANDING_PATH`].
pub async fn login_post(
    State(state): State<AppState>,
    session: AppSession,
    auth: AuthState,
    PostForm(mut form): PostForm<LoginForm>,
) -> AppResult<Response> {
    form.validate();

    if form.is_valid() {
        match users::authenticate(&state.db, &form.email, &form.password).await {
            Ok(user_id) => {
                session.renew_token().await?;
                session.put(AUTHENTICATED_USER_ID_KEY, user_id).await?;
                tracing::info!(user_id, "user logged in");

                let mut target = session.pop_string(REDIRECT_PATH_KEY).await?;
                if target.is_empty() {
                    target = DEFAULT_LANDING_PATH.to_string();
                }
                return Ok(Redirect::to(&target).into_response());
            }
            Err(AppError::InvalidCredentials) => form.add_generic_error(LoginForm::INCORRECT),
            Err(e) => return Err(e),
        }
    }

    let data = template_data(&session, auth).await?.with_form(form);
    render(&state, StatusCode::UNPROCESSABLE_ENTITY, "login.html", &data)
}

pub async fn logout_post(session: AppSession, auth: AuthState) -> AppResult<Response> {
    session.renew_token().await?;
    session.remove(AUTHENTICATED_USER_ID_KEY).await?;
    session
        .put(FLASH_KEY, "You've been logged out successfully!")
        .await?;

    if let Some(user_id) = auth.user_id() {
        tracing::info!(user_id, "user logged out");
    }

    Ok(Redirect::to(LOGIN_PATH).into_response())
}

pub async fn account_view(
    State(state): State<AppState>,
    session: AppSession,
    auth: AuthState,
) -> AppResult<Response> {
    let Some(user_id) = auth.user_id() else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let user = match users::find_by_id(&state.db, user_id).await {
        Ok(user) => user,
        Err(AppError::NotFound) => return Ok(Redirect::to(LOGIN_PATH).into_response()),
        Err(e) => return Err(e),
    };

    let mut data = template_data(&session, auth).await?;
    data.user = Some(user);
    render(&state, StatusCode::OK, "account.html", &data)
}

pub async fn password_update(
    State(state): State<AppState>,
    session: AppSession,
    auth: AuthState,
) -> AppResult<Response> {
    let data = template_data(&session, auth)
        .await?
        .with_form(PasswordUpdateForm::default());
    render(&state, StatusCode::OK, "password.html", &data)
}

/// ## Route
/// POST /account/password/update
pub async fn password_update_post(
    State(state): State<AppState>,
    session: AppSession,
    auth: AuthState,
    PostForm(mut form): PostForm<PasswordUpdateForm>,
) -> AppResult<Response> {
    let Some(user_id) = auth.user_id() else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    form.validate();

    if form.is_valid() {
        let current = users::password_hash(&state.db, user_id).await?;
        if password::verify(form.current_password.clone(), current).await? {
            let hashed = password::hash(form.new_password.clone()).await?;
            users::update_password(&state.db, user_id, &hashed).await?;
            tracing::info!(user_id, "password updated");

            session.put(FLASH_KEY, "Your password has been updated!").await?;
            return Ok(Redirect::to(ACCOUNT_PATH).into_response());
        }
        form.add_field_error("currentPassword", PasswordUpdateForm::WRONG_CURRENT);
    }

    let data = template_data(&session, auth).await?.with_form(form);
    render(&state, StatusCode::UNPROCESSABLE_ENTITY, "password.html", &data)
}
