//! # Routing
//!
//! Three tiers of routes:
//! - plain: `/ping` and `/static/*`, no session is loaded or created
//! - dynamic: wrapped in the session layer and [`authenticate`]
//! - protected: dynamic routes whose handlers also go through [`require_auth`]
//!
//! `route_layer` keeps the session and auth layers off the 404 fallback and
//! the static file service. The layers added last run first.
//!
//! [`require_auth`] is attached to each protected `MethodRouter` rather than
//! to the router, so a wrong method on a protected path still gets its 405.

use axum::{
    middleware,
    routing::{get, post, MethodRouter},
    Extension, Router,
};
use std::path::Path;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;

use crate::handlers::{pages, snippets, users};
use crate::middleware::{
    auth::{authenticate, require_auth},
    headers::secure_headers,
    logging::log_request,
    panic::handle_panic,
};
use crate::session::SessionLifetime;
use crate::state::AppState;

/// Puts the handlers of `route` behind a login, leaving its 405 fallback alone.
fn protect(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn(require_auth))
}

pub fn router(
    state: AppState,
    session_layer: SessionManagerLayer<SqliteStore>,
    lifetime: SessionLifetime,
    static_dir: impl AsRef<Path>,
) -> Router {
    let dynamic = Router::new()
        .route("/", get(snippets::home))
        .route("/about", get(pages::about))
        .route("/snippet/view/{id}", get(snippets::snippet_view))
        .route("/user/signup", get(users::signup).post(users::signup_post))
        .route("/user/login", get(users::login).post(users::login_post))
        .route(
            "/snippet/create",
            protect(get(snippets::snippet_create).post(snippets::snippet_create_post)),
        )
        .route("/user/logout", protect(post(users::logout_post)))
        .route("/account/view", protect(get(users::account_view)))
        .route(
            "/account/password/update",
            protect(get(users::password_update).post(users::password_update_post)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .route_layer(session_layer)
        .route_layer(Extension(lifetime));

    Router::new()
        .merge(dynamic)
        .route("/ping", get(pages::ping))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(pages::not_found)
        .layer(middleware::from_fn(secure_headers))
        .layer(middleware::from_fn(log_request))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
