#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use snippetbox::{routes, session, state::AppState, templates::TemplateCache};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tower::ServiceExt;
use tower_sessions_sqlx_store::SqliteStore;

pub const EMAIL: &str = "alice@example.com";
pub const PASSWORD: &str = "pa55word";

/// The real router over an in-memory database, with a one-cookie jar.
pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub cookie: Option<String>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    pub fn sets_cookie(&self) -> bool {
        self.headers.contains_key(header::SET_COOKIE)
    }
}

impl TestApp {
    pub async fn new() -> Self {
        // One connection that never closes, or the in-memory database is lost.
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        snippetbox::db::migrate(&db).await.unwrap();

        let store = SqliteStore::new(db.clone());
        store.migrate().await.unwrap();

        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let templates = TemplateCache::from_dir(root.join("ui/html")).unwrap();
        let state = AppState::from_parts(db.clone(), templates);
        let layer = session::manager_layer(store, false);
        let router = routes::router(
            state,
            layer,
            session::SessionLifetime(time::Duration::hours(12)),
            root.join("ui/static"),
        );

        TestApp {
            router,
            db,
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Sends `request` with the current session cookie and keeps whatever
    /// session cookie comes back.
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let pair = value.split(';').next().unwrap_or_default().trim();
            if pair.starts_with("session=") {
                self.cookie = Some(pair.to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn signup(&mut self, email: &str, password: &str) -> TestResponse {
        self.post_form(
            "/user/signup",
            &format!("name=Alice&email={}&password={}", encode(email), encode(password)),
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.post_form(
            "/user/login",
            &format!("email={}&password={}", encode(email), encode(password)),
        )
        .await
    }

    /// Signs up and logs in the default user.
    pub async fn logged_in() -> Self {
        let mut app = TestApp::new().await;
        assert_eq!(app.signup(EMAIL, PASSWORD).await.status, StatusCode::SEE_OTHER);
        let response = app.login(EMAIL, PASSWORD).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        app
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.db)
            .await
            .unwrap()
    }
}

pub fn encode(value: &str) -> String {
    serde_urlencoded::to_string([("v", value)])
        .unwrap()
        .trim_start_matches("v=")
        .to_string()
}
