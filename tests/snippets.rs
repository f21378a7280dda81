mod common;

use axum::http::{header, StatusCode};
use chrono::{Duration, Utc};
use common::TestApp;

#[tokio::test]
async fn create_snippet_redirects_to_its_page() {
    let mut app = TestApp::logged_in().await;

    let response = app
        .post_form("/snippet/create", "title=Hi&content=World&expires=7")
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let location = response.location().unwrap().to_string();
    assert!(location.starts_with("/snippet/view/"), "{location}");

    let page = app.get(&location).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<strong>Hi</strong>"));
    assert!(page.body.contains("World"));
    assert!(page.body.contains("Snippet successfully created!"));

    // the flash is gone on the next page
    let again = app.get(&location).await;
    assert!(!again.body.contains("Snippet successfully created!"));
}

#[tokio::test]
async fn blank_title_rerenders_form_with_submitted_values() {
    let mut app = TestApp::logged_in().await;

    let response = app
        .post_form("/snippet/create", "title=&content=kept+content&expires=7")
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response
        .body
        .contains(r#"<label class="error">This field cannot be blank</label>"#));
    assert!(response.body.contains(r#"value="7" checked"#));
    assert!(!response.body.contains(r#"value="365" checked"#));
    assert!(response.body.contains("kept content"));
    assert_eq!(app.count("snippets").await, 0);
}

#[tokio::test]
async fn expires_outside_allow_list_is_a_validation_error() {
    let mut app = TestApp::logged_in().await;

    let response = app
        .post_form("/snippet/create", "title=Hi&content=World&expires=30")
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field must equal 1, 7 or 365"));
}

#[tokio::test]
async fn non_numeric_expires_is_a_bad_request() {
    let mut app = TestApp::logged_in().await;

    let response = app
        .post_form("/snippet/create", "title=Hi&content=World&expires=forever")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Bad Request");
}

#[tokio::test]
async fn create_form_defaults_to_one_year() {
    let mut app = TestApp::logged_in().await;

    let response = app.get("/snippet/create").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"value="365" checked"#));
    assert_eq!(response.headers[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn expired_snippet_is_not_found() {
    let mut app = TestApp::new().await;
    let id = snippetbox::db::snippets::insert(&app.db, "Old", "news", 1)
        .await
        .unwrap();
    sqlx::query("UPDATE snippets SET expires = ? WHERE id = ?")
        .bind(Utc::now() - Duration::seconds(1))
        .bind(id)
        .execute(&app.db)
        .await
        .unwrap();

    let response = app.get(&format!("/snippet/view/{id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, "Not Found");

    let home = app.get("/").await;
    assert!(!home.body.contains("Old"));
}

#[tokio::test]
async fn malformed_ids_are_not_found() {
    let mut app = TestApp::new().await;

    for uri in ["/snippet/view/abc", "/snippet/view/0", "/snippet/view/-3", "/snippet/view/99"] {
        assert_eq!(app.get(uri).await.status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn home_lists_latest_snippets() {
    let mut app = TestApp::new().await;
    for title in ["first", "second"] {
        snippetbox::db::snippets::insert(&app.db, title, "body", 365)
            .await
            .unwrap();
    }

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    let second = response.body.find("second").unwrap();
    let first = response.body.find("first").unwrap();
    assert!(second < first, "newest snippet should come first");
}
