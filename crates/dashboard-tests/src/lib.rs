//! Integration test harness for the Trading Dashboard API.
//!
//! Each test starts the real router on an ephemeral port, backed by the
//! Supabase identity adapter pointed at a `wiremock` server standing in for
//! Supabase Auth, and drives it through [`DashboardClient`].

use dashboard_client::{ClientConfig, DashboardClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use trading_dashboard_backend::api::create_router;
use trading_dashboard_backend::config::AuthConfig;
use trading_dashboard_backend::identity::SupabaseIdentityProvider;
use trading_dashboard_backend::state::AppState;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Anon key the server under test sends to the mock provider.
pub const TEST_ANON_KEY: &str = "test-anon-key";

/// Path of the mocked Supabase Auth endpoint.
pub const USER_PATH: &str = "/auth/v1/user";

/// A running server and a client pointed at it.
pub struct TestApp {
    /// Client for the server under test.
    pub client: DashboardClient,
    /// Mock Supabase Auth server.
    pub provider: MockServer,
}

/// Starts the API with the given identity provider timeout.
///
/// # Errors
/// Returns error if the server cannot bind or the clients cannot be built.
pub async fn spawn_app_with_timeout(auth_timeout: Duration) -> anyhow::Result<TestApp> {
    let provider = MockServer::start().await;

    let auth = AuthConfig {
        supabase_url: provider.uri(),
        supabase_anon_key: TEST_ANON_KEY.to_string(),
        timeout_ms: auth_timeout.as_millis() as u64,
    };
    let identity = SupabaseIdentityProvider::new(&auth)?;
    let state = Arc::new(AppState::new(Arc::new(identity), auth.timeout()));
    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = DashboardClient::new(ClientConfig {
        base_url: format!("http://{}", addr),
        timeout: Duration::from_secs(10),
    })?;

    Ok(TestApp { client, provider })
}

/// Starts the API with a two second identity provider timeout.
///
/// # Errors
/// Returns error if the server cannot bind or the clients cannot be built.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    spawn_app_with_timeout(Duration::from_secs(2)).await
}

/// Makes the mock provider accept `token` as the given user, expecting
/// exactly `times` verification calls.
pub async fn accept_token(server: &MockServer, token: &str, id: &str, email: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(USER_PATH))
        .and(header("apikey", TEST_ANON_KEY))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": id,
            "email": email,
            "aud": "authenticated",
            "role": "authenticated"
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Makes the mock provider reject every token with `message`.
pub async fn reject_all(server: &MockServer, message: &str) {
    Mock::given(method("GET"))
        .and(path(USER_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "code": 401,
            "msg": message
        })))
        .mount(server)
        .await;
}

/// Number of requests the mock provider has received.
pub async fn provider_calls(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}
