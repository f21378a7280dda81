//! # Security Headers
//!
//! Every response, 404s and static files included, leaves with the same set
//! of hardening headers:
//!
//! | Header | Value |
//! |---|---|
//! | `Content-Security-Policy` | own origin, plus Google Fonts for styles and fonts |
//! | `Referrer-Policy` | `origin-when-cross-origin` |
//! | `X-Content-Type-Options` | `nosniff` |
//! | `X-Frame-Options` | `deny` |
//! | `X-XSS-Protection` | `0` (filter off) |

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com";
const REFERRER_POLICY: &str = "origin-when-cross-origin";

pub async fn secure_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static(REFERRER_POLICY),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("deny"));
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));

    response
}
