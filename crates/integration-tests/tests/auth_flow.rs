//! Integration tests for the authentication session flow.
//!
//! The app is driven over HTTP with a cookie-holding client; the mock
//! backend's counters verify which auth endpoints were actually consulted.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::Ordering;

use reqwest::{Client, StatusCode, redirect::Policy};
use vesta_core::Gender;
use vesta_integration_tests::{
    TEST_PASSWORD, TEST_USER_NAME, sample_product, spawn_app, spawn_backend,
};

fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .unwrap()
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

async fn login(client: &Client, app: &str) {
    let response = client
        .post(format!("{app}/auth/login"))
        .form(&[("email", "ada@example.com"), ("password", TEST_PASSWORD)])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn anonymous_admin_request_redirects_to_login_without_network() {
    let backend = spawn_backend(Vec::new()).await;
    let app = spawn_app(&backend.url).await;
    let client = browser();

    let response = client
        .get(format!("{app}/admin/products"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/auth/login");
    // No stored token: the status check resolves locally.
    assert_eq!(backend.state.counters.check_status.load(Ordering::SeqCst), 0);
    assert_eq!(backend.state.counters.login.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn login_establishes_the_session() {
    let backend = spawn_backend(vec![sample_product("p1", "Crew Neck", Gender::Men)]).await;
    let app = spawn_app(&backend.url).await;
    let client = browser();

    login(&client, &app).await;
    assert_eq!(backend.state.counters.login.load(Ordering::SeqCst), 1);

    // The admin surface is now reachable.
    let response = client
        .get(format!("{app}/admin/products"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The header greets the signed-in user.
    let home = client.get(format!("{app}/")).send().await.unwrap();
    let body = home.text().await.unwrap();
    assert!(body.contains(TEST_USER_NAME));

    // An established session never re-enters the checking state.
    assert_eq!(backend.state.counters.check_status.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejected_credentials_clear_the_session() {
    let backend = spawn_backend(Vec::new()).await;
    let app = spawn_app(&backend.url).await;
    let client = browser();

    let response = client
        .post(format!("{app}/auth/login"))
        .form(&[("email", "ada@example.com"), ("password", "wrong")])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/auth/login?error=credentials");

    // Still anonymous.
    let response = client
        .get(format!("{app}/admin/products"))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn logout_clears_the_session_without_network() {
    let backend = spawn_backend(Vec::new()).await;
    let app = spawn_app(&backend.url).await;
    let client = browser();

    login(&client, &app).await;
    let requests_before = backend.state.counters.login.load(Ordering::SeqCst)
        + backend.state.counters.check_status.load(Ordering::SeqCst);

    let response = client
        .post(format!("{app}/auth/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/");

    let requests_after = backend.state.counters.login.load(Ordering::SeqCst)
        + backend.state.counters.check_status.load(Ordering::SeqCst);
    assert_eq!(requests_before, requests_after);

    let response = client
        .get(format!("{app}/admin/products"))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn registration_signs_the_user_in() {
    let backend = spawn_backend(Vec::new()).await;
    let app = spawn_app(&backend.url).await;
    let client = browser();

    let response = client
        .post(format!("{app}/auth/register"))
        .form(&[
            ("full_name", "Grace Hopper"),
            ("email", "grace@example.com"),
            ("password", "longenough"),
            ("password_confirm", "longenough"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(location(&response), "/");
    assert_eq!(backend.state.counters.register.load(Ordering::SeqCst), 1);

    let home = client.get(format!("{app}/")).send().await.unwrap();
    let body = home.text().await.unwrap();
    assert!(body.contains("Grace Hopper"));
}

#[tokio::test]
async fn register_validates_locally_before_the_backend() {
    let backend = spawn_backend(Vec::new()).await;
    let app = spawn_app(&backend.url).await;
    let client = browser();

    let cases = [
        (
            [
                ("full_name", "Grace"),
                ("email", "grace@example.com"),
                ("password", "abc"),
                ("password_confirm", "abc"),
            ],
            "/auth/register?error=password_too_short",
        ),
        (
            [
                ("full_name", "Grace"),
                ("email", "grace@example.com"),
                ("password", "longenough"),
                ("password_confirm", "different"),
            ],
            "/auth/register?error=password_mismatch",
        ),
        (
            [
                ("full_name", "Grace"),
                ("email", "not-an-email"),
                ("password", "longenough"),
                ("password_confirm", "longenough"),
            ],
            "/auth/register?error=invalid_email",
        ),
    ];

    for (form, expected) in cases {
        let response = client
            .post(format!("{app}/auth/register"))
            .form(&form)
            .send()
            .await
            .unwrap();
        assert_eq!(location(&response), expected);
    }

    assert_eq!(backend.state.counters.register.load(Ordering::SeqCst), 0);
}
