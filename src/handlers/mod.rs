//! # HTTP Request Handlers
//!
//! Thin per-route glue: pull what the route needs out of the request, call
//! into storage and the form validators, then pick a page to render or a
//! place to redirect to.
//!
//! ## Submodules
//! - `pages`: static pages, health check and the 404 fallback
//! - `snippets`: listing, viewing and creating snippets
//! - `users`: signup, login, logout and the account pages
//!
//! Every rendered page starts from [`template_data`], which pops the flash
//! message so it is shown exactly once.

pub mod pages;
pub mod snippets;
pub mod users;

use axum::{http::StatusCode, response::Response};

use crate::error::AppResult;
use crate::middleware::auth::AuthState;
use crate::session::{AppSession, FLASH_KEY};
use crate::state::AppState;
use crate::templates::TemplateData;

/// Fresh envelope for this request, consuming any pending flash message.
pub(crate) async fn template_data(session: &AppSession, auth: AuthState) -> AppResult<TemplateData> {
    let flash = session.pop_string(FLASH_KEY).await?;
    Ok(TemplateData::new(flash, auth.is_authenticated()))
}

pub(crate) fn render(
    state: &AppState,
    status: StatusCode,
    page: &str,
    data: &TemplateData,
) -> AppResult<Response> {
    Ok(state.templates.render(status, page, data)?)
}
