mod common;

use axum::http::StatusCode;
use common::{TestApp, EMAIL, PASSWORD};

#[tokio::test]
async fn signup_then_login_lands_on_default_page() {
    let mut app = TestApp::new().await;

    let response = app.signup(EMAIL, PASSWORD).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/user/login"));

    let page = app.get("/user/login").await;
    assert!(page.body.contains("Your signup was successful. Please log in."));

    let response = app.login(EMAIL, PASSWORD).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/snippet/create"));
}

#[tokio::test]
async fn duplicate_signup_is_a_field_error() {
    let mut app = TestApp::new().await;
    assert_eq!(app.signup(EMAIL, PASSWORD).await.status, StatusCode::SEE_OTHER);

    let response = app.signup(EMAIL, "an0ther-pa55").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Email address is already in use"));
    assert!(response.body.contains(EMAIL));
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn invalid_signup_keeps_values_but_not_password() {
    let mut app = TestApp::new().await;

    let response = app.signup("not-an-email", "short-secret-x").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field must be a valid email address"));
    assert!(response.body.contains(r#"value="not-an-email""#));
    assert!(!response.body.contains("short-secret-x"));
}

#[tokio::test]
async fn login_rotates_the_session_token() {
    let mut app = TestApp::new().await;
    app.signup(EMAIL, PASSWORD).await;
    let before_login = app.cookie.clone().unwrap();

    app.login(EMAIL, PASSWORD).await;
    let after_login = app.cookie.clone().unwrap();
    assert_ne!(before_login, after_login);

    assert_eq!(app.get("/account/view").await.status, StatusCode::OK);

    // the pre-login token does not carry the identity
    app.cookie = Some(before_login);
    let response = app.get("/account/view").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/user/login"));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let mut app = TestApp::new().await;
    app.signup(EMAIL, PASSWORD).await;

    let wrong_password = app.login(EMAIL, "not-the-password").await;
    let unknown_email = app.login("bob@example.com", PASSWORD).await;

    for response in [&wrong_password, &unknown_email] {
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.body.contains("Email or password is incorrect"));
    }
}

#[tokio::test]
async fn protected_page_redirects_and_login_returns_there() {
    let mut app = TestApp::new().await;
    app.signup(EMAIL, PASSWORD).await;

    let response = app.get("/account/view").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/user/login"));

    let response = app.login(EMAIL, PASSWORD).await;
    assert_eq!(response.location(), Some("/account/view"));

    // the stored path is used once
    app.post_form("/user/logout", "").await;
    let response = app.login(EMAIL, PASSWORD).await;
    assert_eq!(response.location(), Some("/snippet/create"));
}

#[tokio::test]
async fn anonymous_create_redirects_then_returns_after_login() {
    let mut app = TestApp::new().await;
    app.signup(EMAIL, PASSWORD).await;

    let response = app.get("/snippet/create").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/user/login"));

    let response = app.login(EMAIL, PASSWORD).await;
    assert_eq!(response.location(), Some("/snippet/create"));
    assert_eq!(app.get("/snippet/create").await.status, StatusCode::OK);
}

#[tokio::test]
async fn wrong_method_is_never_the_page_to_return_to() {
    let mut app = TestApp::new().await;
    app.signup(EMAIL, PASSWORD).await;

    let response = app.get("/user/logout").await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);

    let response = app.login(EMAIL, PASSWORD).await;
    assert_eq!(response.location(), Some("/snippet/create"));
}

#[tokio::test]
async fn logout_clears_identity() {
    let mut app = TestApp::logged_in().await;
    let logged_in_cookie = app.cookie.clone();

    let response = app.post_form("/user/logout", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/user/login"));
    assert_ne!(app.cookie, logged_in_cookie);

    let page = app.get("/user/login").await;
    assert!(page.body.contains("logged out successfully!"));
    assert!(page.body.contains(r#"href="/user/signup""#));

    assert_eq!(app.get("/account/view").await.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn deleted_account_downgrades_to_anonymous() {
    let mut app = TestApp::logged_in().await;
    sqlx::query("DELETE FROM users").execute(&app.db).await.unwrap();

    let home = app.get("/").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.body.contains(r#"href="/user/login""#));
    assert!(!home.body.contains("Logout"));

    assert_eq!(app.get("/account/view").await.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn account_page_shows_profile() {
    let mut app = TestApp::logged_in().await;

    let response = app.get("/account/view").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Alice"));
    assert!(response.body.contains(EMAIL));
}

#[tokio::test]
async fn password_update_checks_current_password() {
    let mut app = TestApp::logged_in().await;

    let response = app
        .post_form(
            "/account/password/update",
            "currentPassword=wrong-one&newPassword=n3w-pa55word&newPasswordConfirmation=n3w-pa55word",
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Current password is incorrect"));

    let response = app
        .post_form(
            "/account/password/update",
            "currentPassword=pa55word&newPassword=n3w-pa55word&newPasswordConfirmation=n3w-pa55word",
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/account/view"));

    let page = app.get("/account/view").await;
    assert!(page.body.contains("Your password has been updated!"));

    app.post_form("/user/logout", "").await;
    assert_eq!(app.login(EMAIL, PASSWORD).await.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.login(EMAIL, "n3w-pa55word").await.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn password_update_requires_matching_confirmation() {
    let mut app = TestApp::logged_in().await;

    let response = app
        .post_form(
            "/account/password/update",
            "currentPassword=pa55word&newPassword=n3w-pa55word&newPasswordConfirmation=different1",
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Passwords do not match"));
}
