//! Authentication filter tests against a mocked Supabase Auth server.

use dashboard_client::Error;
use dashboard_tests::{
    USER_PATH, accept_token, provider_calls, reject_all, spawn_app, spawn_app_with_timeout,
};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn assert_unauthorized(result: Result<impl std::fmt::Debug, Error>, expected: &str) {
    match result {
        Err(Error::Unauthorized(message)) => assert_eq!(message, expected),
        other => panic!("expected 401 with {:?}, got {:?}", expected, other),
    }
}

#[tokio::test]
async fn test_missing_header_never_reaches_provider() {
    let app = spawn_app().await.expect("Failed to start app");
    accept_token(&app.provider, "xyz", "42", "x@y.com", 0).await;

    let result = app.client.protected_with_header(None).await;

    assert_unauthorized(result, "No authorization header");
    assert_eq!(provider_calls(&app.provider).await, 0);
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let app = spawn_app().await.expect("Failed to start app");
    accept_token(&app.provider, "xyz", "42", "x@y.com", 1).await;

    let response = app.client.protected("xyz").await.expect("Request failed");

    assert_eq!(response.message, "This is a protected route");
    assert_eq!(response.user.id, "42");
    assert_eq!(response.user.email, "x@y.com");
}

#[tokio::test]
async fn test_prefix_is_stripped_before_verification() {
    let app = spawn_app().await.expect("Failed to start app");
    accept_token(&app.provider, "abc123", "u1", "a@b.com", 1).await;

    let response = app
        .client
        .protected_with_header(Some("Bearer abc123"))
        .await
        .expect("Request failed");

    assert_eq!(response.user.id, "u1");
    assert_eq!(response.user.email, "a@b.com");

    let requests = app.provider.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let forwarded = requests[0]
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok());
    assert_eq!(forwarded, Some("Bearer abc123"));
}

#[tokio::test]
async fn test_rejected_token() {
    let app = spawn_app().await.expect("Failed to start app");
    reject_all(&app.provider, "invalid JWT: token is expired").await;

    let result = app.client.protected("expired").await;

    assert_unauthorized(result, "Invalid token");
    assert_eq!(provider_calls(&app.provider).await, 1);
}

#[tokio::test]
async fn test_provider_without_user_is_rejected() {
    let app = spawn_app().await.expect("Failed to start app");
    Mock::given(method("GET"))
        .and(path(USER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&app.provider)
        .await;

    let result = app.client.protected("xyz").await;

    assert_unauthorized(result, "Invalid token");
}

#[tokio::test]
async fn test_malformed_provider_response_is_invalid_token() {
    let app = spawn_app().await.expect("Failed to start app");
    Mock::given(method("GET"))
        .and(path(USER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>bad gateway</html>"))
        .mount(&app.provider)
        .await;

    let result = app.client.protected("xyz").await;

    assert_unauthorized(result, "Invalid token");
}

#[tokio::test]
async fn test_provider_server_error_is_invalid_token() {
    let app = spawn_app().await.expect("Failed to start app");
    Mock::given(method("GET"))
        .and(path(USER_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.provider)
        .await;

    let result = app.client.protected("xyz").await;

    assert_unauthorized(result, "Invalid token");
}

#[tokio::test]
async fn test_slow_provider_is_invalid_token() {
    let app = spawn_app_with_timeout(Duration::from_millis(200))
        .await
        .expect("Failed to start app");
    Mock::given(method("GET"))
        .and(path(USER_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": "42", "email": "x@y.com" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&app.provider)
        .await;

    let result = app.client.protected("xyz").await;

    assert_unauthorized(result, "Invalid token");
}

#[tokio::test]
async fn test_repeated_requests_verify_each_time() {
    let app = spawn_app().await.expect("Failed to start app");
    accept_token(&app.provider, "same", "42", "x@y.com", 2).await;

    app.client.protected("same").await.expect("First request failed");
    app.client.protected("same").await.expect("Second request failed");

    assert_eq!(provider_calls(&app.provider).await, 2);
}

#[tokio::test]
async fn test_revoked_token_fails_on_next_request() {
    let app = spawn_app().await.expect("Failed to start app");
    accept_token(&app.provider, "same", "42", "x@y.com", 1).await;

    app.client.protected("same").await.expect("First request failed");

    app.provider.reset().await;
    reject_all(&app.provider, "session not found").await;

    let result = app.client.protected("same").await;
    assert_unauthorized(result, "Invalid token");
}

#[tokio::test]
async fn test_dashboard_requires_token() {
    let app = spawn_app().await.expect("Failed to start app");
    accept_token(&app.provider, "xyz", "42", "x@y.com", 1).await;

    let summary = app.client.dashboard("xyz").await.expect("Request failed");

    assert_eq!(summary.user.id, "42");
    assert_eq!(summary.total_pnl, 0.0);
    assert_eq!(summary.active_trades, 0);
    assert_eq!(summary.win_rate, 0.0);
    assert!(summary.recent_trades.is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = spawn_app().await.expect("Failed to start app");

    let err = dashboard_client::DashboardClient::with_base_url(&format!(
        "{}/does-not-exist",
        app.client.base_url()
    ))
    .expect("Failed to build client")
    .health_check()
    .await
    .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
