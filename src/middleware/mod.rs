//! # Middleware
//!
//! Applied to every request, outermost first:
//! 1. panic recovery (`tower_http::catch_panic`, see [`panic::handle_panic`])
//! 2. [`logging::log_request`]
//! 3. [`headers::secure_headers`]
//!
//! Dynamic (session-aware) routes add the session layer and then
//! [`auth::authenticate`]; protected routes add [`auth::require_auth`] inside
//! that.

pub mod auth;
pub mod headers;
pub mod logging;
pub mod panic;
