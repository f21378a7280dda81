//! # Snippet Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use super::{render, template_data};
use crate::db::snippets;
use crate::error::{AppError, AppResult};
use crate::forms::{PostForm, SnippetCreateForm};
use crate::middleware::auth::AuthState;
use crate::session::{AppSession, FLASH_KEY};
use crate::state::AppState;
use crate::validator::Validated;

/// Home page with the latest live snippets.
///
/// ## Route
/// GET /
pub async fn home(
    State(state): State<AppState>,
    session: AppSession,
    auth: AuthState,
) -> AppResult<Response> {
    let mut data = template_data(&session, auth).await?;
    data.snippets = snippets::latest(&state.db).await?;

    render(&state, StatusCode::OK, "home.html", &data)
}

/// One snippet.
///
/// ## Route
/// GET /snippet/view/{id}
///
/// An id that is not a positive integer is treated like an unknown one: 404.
pub async fn snippet_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: AppSession,
    auth: AuthState,
) -> AppResult<Response> {
    let id = id
        .parse::<i64>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or(AppError::NotFound)?;

    let snippet = snippets::get(&state.db, id).await?;

    let mut data = template_data(&session, auth).await?;
    data.snippet = Some(snippet);

    render(&state, StatusCode::OK, "view.html", &data)
}

pub async fn snippet_create(
    State(state): State<AppState>,
    session: AppSession,
    auth: AuthState,
) -> AppResult<Response> {
    let data = template_data(&session, auth)
        .await?
        .with_form(SnippetCreateForm::default());

    render(&state, StatusCode::OK, "create.html", &data)
}

/// ## Route
/// POST /snippet/create
///
/// Invalid input re-renders the form (422) with the submitted values kept.
pub async fn snippet_create_post(
    State(state): State<AppState>,
    session: AppSession,
    auth: AuthState,
    PostForm(mut form): PostForm<SnippetCreateForm>,
) -> AppResult<Response> {
    form.validate();
    if !form.is_valid() {
        let data = template_data(&session, auth).await?.with_form(form);
        return render(&state, StatusCode::UNPROCESSABLE_ENTITY, "create.html", &data);
    }

    let id = snippets::insert(&state.db, &form.title, &form.content, form.expires).await?;
    tracing::debug!(snippet_id = id, "snippet created");

    session.put(FLASH_KEY, "Snippet successfully created!").await?;

    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}
