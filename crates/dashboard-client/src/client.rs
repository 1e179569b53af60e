//! HTTP client for the dashboard API.

use crate::error::Error;
use crate::types::*;
use reqwest::{Client, StatusCode};
use std::time::Duration;


/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:4000").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Trading Dashboard API.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Runs the database smoke test.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn test_db(&self) -> Result<DbCheckResponse, Error> {
        let url = format!("{}/test-db", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Authenticated
    // ========================================================================

    /// Calls the protected example route with a bearer token.
    ///
    /// # Errors
    /// Returns [`Error::Unauthorized`] if the token is refused.
    pub async fn protected(&self, token: &str) -> Result<ProtectedResponse, Error> {
        self.protected_with_header(Some(&format!("Bearer {}", token)))
            .await
    }

    /// Calls the protected example route with a raw `Authorization` header,
    /// or with none.
    ///
    /// # Errors
    /// Returns [`Error::Unauthorized`] if the credentials are refused.
    pub async fn protected_with_header(
        &self,
        authorization: Option<&str>,
    ) -> Result<ProtectedResponse, Error> {
        let url = format!("{}/protected", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(value) = authorization {
            request = request.header(reqwest::header::AUTHORIZATION, value);
        }
        let resp = request.send().await?;
        self.handle_response(resp).await
    }

    /// Gets the dashboard summary for the token's owner.
    ///
    /// # Errors
    /// Returns [`Error::Unauthorized`] if the token is refused.
    pub async fn dashboard(&self, token: &str) -> Result<DashboardSummary, Error> {
        let url = format!("{}/api/v1/dashboard", self.base_url);
        let resp = self.client.get(&url).bearer_auth(token).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);

        if status == StatusCode::UNAUTHORIZED {
            Err(Error::Unauthorized(message))
        } else if status == StatusCode::NOT_FOUND {
            Err(Error::NotFound(message))
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
