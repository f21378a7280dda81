//! # Access Log
//!
//! One `info` event per request, written before the request is handled so a
//! request that panics or hangs still shows up. Fields: `remote_addr`,
//! `proto`, `method` and `uri`.

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

/// Access log: one event per request, before it is handled.
pub async fn log_request(request: Request, next: Next) -> Response {
    // Only present when served with `into_make_service_with_connect_info`
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info!(
        remote_addr = %remote_addr,
        proto = ?request.version(),
        method = %request.method(),
        uri = %request.uri(),
        "received request"
    );

    next.run(request).await
}
