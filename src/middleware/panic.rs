//! # Panic Recovery
//!
//! Plugged into `tower_http::catch_panic::CatchPanicLayer`. A panicking
//! handler is logged at `error` with its message and a backtrace, and the
//! client gets the same bare 500 as any other server fault.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::{any::Any, backtrace::Backtrace};

/// Turns a handler panic into a bare 500 and asks the client to drop the
/// connection.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(
        panic = detail,
        backtrace = %Backtrace::force_capture(),
        "handler panicked"
    );

    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let mut response = (status, status.canonical_reason().unwrap_or("Error")).into_response();
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}
