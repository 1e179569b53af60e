//! Identity provider adapters used to verify bearer tokens.
//!
//! The gate in [`crate::auth`] only talks to the [`IdentityProvider`] trait.
//! [`SupabaseIdentityProvider`] is the production implementation and calls
//! the Supabase Auth `GET /auth/v1/user` endpoint with the caller's token.

use crate::auth::Principal;
use crate::config::AuthConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Path of the Supabase Auth endpoint returning the user owning a token.
const USER_ENDPOINT_PATH: &str = "/auth/v1/user";

/// Header carrying the project's anon key on every Supabase request.
const API_KEY_HEADER: &str = "apikey";

/// Infrastructure faults raised while talking to the identity provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, TLS or protocol error.
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider did not answer in time.
    #[error("identity provider timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered with a body that could not be decoded.
    #[error("malformed identity provider response: {0}")]
    MalformedResponse(String),
}

/// Outcome of a verification call the provider answered.
///
/// Mirrors the provider's `{ user, error }` result: a token is accepted only
/// when `user` is present and `error` is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenVerification {
    /// The identity owning the token, if any.
    pub user: Option<Principal>,
    /// Error reported by the provider, if any.
    pub error: Option<String>,
}

impl TokenVerification {
    /// A verification that resolved to `principal`.
    #[must_use]
    pub fn verified(principal: Principal) -> Self {
        Self {
            user: Some(principal),
            error: None,
        }
    }

    /// A verification the provider rejected with `message`.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            user: None,
            error: Some(message.into()),
        }
    }
}

/// A service able to resolve an opaque bearer token into a [`Principal`].
///
/// Implementations are shared read-only across concurrent requests and must
/// not cache results: every call is one independent round-trip.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies `token` and returns the provider's answer.
    ///
    /// # Errors
    /// Returns [`ProviderError`] when the provider could not be reached or
    /// its answer could not be understood.
    async fn verify_token(&self, token: &str) -> Result<TokenVerification, ProviderError>;
}

/// User object returned by Supabase Auth.
#[derive(Debug, Deserialize)]
struct SupabaseUser {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Error body returned by Supabase Auth. The field carrying the message
/// differs between GoTrue versions.
#[derive(Debug, Default, Deserialize)]
struct SupabaseErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl SupabaseErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
    }
}

/// Supabase Auth adapter.
#[derive(Debug, Clone)]
pub struct SupabaseIdentityProvider {
    client: Client,
    user_endpoint: String,
    anon_key: String,
    timeout: Duration,
}

impl SupabaseIdentityProvider {
    /// Creates an adapter for the project described by `config`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &AuthConfig) -> Result<Self, ProviderError> {
        let timeout = config.timeout();
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            user_endpoint: format!(
                "{}{}",
                config.supabase_url.trim_end_matches('/'),
                USER_ENDPOINT_PATH
            ),
            anon_key: config.supabase_anon_key.clone(),
            timeout,
        })
    }

    /// Returns the URL queried for each verification.
    #[must_use]
    pub fn user_endpoint(&self) -> &str {
        &self.user_endpoint
    }

    fn request_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::Http(e)
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<TokenVerification, ProviderError> {
        let response = self
            .client
            .get(&self.user_endpoint)
            .header(API_KEY_HEADER, &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<SupabaseErrorBody>(&body)
                .unwrap_or_default()
                .into_message()
                .unwrap_or_else(|| format!("identity provider returned {}", status));
            debug!(status = status.as_u16(), %message, "token rejected by identity provider");
            return Ok(TokenVerification::rejected(message));
        }

        let user = serde_json::from_slice::<Option<SupabaseUser>>(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let principal = user.and_then(|user| match user.id {
            Some(id) if !id.is_empty() => Some(Principal {
                id,
                email: user.email.unwrap_or_default(),
            }),
            _ => None,
        });

        Ok(TokenVerification {
            user: principal,
            error: None,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> AuthConfig {
        AuthConfig {
            supabase_url: server.uri(),
            supabase_anon_key: "anon-key".to_string(),
            timeout_ms: 500,
        }
    }

    #[test]
    fn test_user_endpoint_trims_trailing_slash() {
        let config = AuthConfig {
            supabase_url: "https://demo.supabase.co/".to_string(),
            supabase_anon_key: "anon".to_string(),
            timeout_ms: 1000,
        };
        let provider = SupabaseIdentityProvider::new(&config).unwrap();
        assert_eq!(
            provider.user_endpoint(),
            "https://demo.supabase.co/auth/v1/user"
        );
    }

    #[tokio::test]
    async fn test_verify_token_returns_principal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer good-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "42",
                "email": "x@y.com",
                "aud": "authenticated",
                "role": "authenticated"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = SupabaseIdentityProvider::new(&config_for(&server)).unwrap();
        let verification = provider.verify_token("good-token").await.unwrap();

        assert_eq!(
            verification,
            TokenVerification::verified(Principal {
                id: "42".to_string(),
                email: "x@y.com".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_verify_token_missing_email_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "phone-user",
                "phone": "+15550100"
            })))
            .mount(&server)
            .await;

        let provider = SupabaseIdentityProvider::new(&config_for(&server)).unwrap();
        let principal = provider.verify_token("t").await.unwrap().user.unwrap();

        assert_eq!(principal.id, "phone-user");
        assert_eq!(principal.email, "");
    }

    #[tokio::test]
    async fn test_verify_token_rejected_reads_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "code": 401,
                "msg": "invalid JWT: token is expired"
            })))
            .mount(&server)
            .await;

        let provider = SupabaseIdentityProvider::new(&config_for(&server)).unwrap();
        let verification = provider.verify_token("expired").await.unwrap();

        assert!(verification.user.is_none());
        assert_eq!(
            verification.error.as_deref(),
            Some("invalid JWT: token is expired")
        );
    }

    #[tokio::test]
    async fn test_verify_token_rejected_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let provider = SupabaseIdentityProvider::new(&config_for(&server)).unwrap();
        let verification = provider.verify_token("t").await.unwrap();

        assert!(verification.user.is_none());
        assert!(verification.error.unwrap().contains("403"));
    }

    #[tokio::test]
    async fn test_verify_token_null_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let provider = SupabaseIdentityProvider::new(&config_for(&server)).unwrap();
        let verification = provider.verify_token("t").await.unwrap();

        assert_eq!(verification, TokenVerification::default());
    }

    #[tokio::test]
    async fn test_verify_token_malformed_body_is_fault() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let provider = SupabaseIdentityProvider::new(&config_for(&server)).unwrap();
        let err = provider.verify_token("t").await.unwrap_err();

        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_verify_token_slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "1" }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let provider = SupabaseIdentityProvider::new(&config_for(&server)).unwrap();
        let err = provider.verify_token("t").await.unwrap_err();

        assert!(matches!(err, ProviderError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_verify_token_stalled_body_times_out() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Sends the status line and headers, then never finishes the body.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\n\r\n{\"id\":")
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let provider = SupabaseIdentityProvider::new(&AuthConfig {
            supabase_url: format!("http://{}", addr),
            supabase_anon_key: "anon-key".to_string(),
            timeout_ms: 300,
        })
        .unwrap();
        let err = provider.verify_token("t").await.unwrap_err();

        assert!(matches!(err, ProviderError::Timeout(_)));
    }

    #[test]
    fn test_error_body_message_precedence() {
        let body: SupabaseErrorBody = serde_json::from_str(
            r#"{"error": "invalid_grant", "error_description": "Invalid Refresh Token"}"#,
        )
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid Refresh Token"));
    }
}
