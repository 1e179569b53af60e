//! Bearer-token authentication gate.
//!
//! [`AuthGate::authenticate`] turns the `Authorization` header of a request
//! into either a verified [`Principal`] or an [`AuthFailure`]. It performs no
//! HTTP response construction: the `require_auth` middleware in
//! [`crate::api::middleware`] maps failures to `401 Unauthorized`.
//!
//! ```text
//! START --(no header)----------------------> MissingCredential
//! START --(header)--> strip "Bearer " --> verify_token
//!                                           |-- error / fault / no user --> InvalidCredential
//!                                           `-- user --> Principal
//! ```
//!
//! Every call performs exactly one provider round-trip; nothing is cached.

use crate::error::ApiError;
use crate::identity::IdentityProvider;
use axum::extract::FromRequestParts;
use axum::http::HeaderValue;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use utoipa::ToSchema;

/// Scheme prefix stripped from the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Verified identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// Opaque user identifier issued by the identity provider.
    pub id: String,
    /// Email address as reported by the identity provider.
    pub email: String,
}

/// Reasons a request is refused by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// No `Authorization` header was sent.
    #[error("No authorization header")]
    MissingCredential,

    /// The token was rejected, or the provider could not verify it.
    #[error("Invalid token")]
    InvalidCredential,
}

/// Returns the raw token carried by an `Authorization` header value.
///
/// The case-sensitive `"Bearer "` prefix is removed once when present; the
/// remainder is passed through untouched.
#[must_use]
pub fn extract_token(header: &str) -> &str {
    header.strip_prefix(BEARER_PREFIX).unwrap_or(header)
}

/// Gate resolving bearer credentials through an [`IdentityProvider`].
#[derive(Clone)]
pub struct AuthGate {
    provider: Arc<dyn IdentityProvider>,
    timeout: Duration,
}

impl AuthGate {
    /// Creates a gate backed by `provider`, bounding each verification by
    /// `timeout`.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Authenticates a raw header value as received from the transport.
    ///
    /// A header that is present but not visible ASCII cannot carry a token
    /// the provider issued and is refused without a provider call.
    ///
    /// # Errors
    /// See [`AuthGate::authenticate`].
    pub async fn authenticate_header(
        &self,
        header: Option<&HeaderValue>,
    ) -> Result<Principal, AuthFailure> {
        match header {
            None => self.authenticate(None).await,
            Some(value) => match value.to_str() {
                Ok(value) => self.authenticate(Some(value)).await,
                Err(_) => {
                    debug!("authorization header is not visible ASCII");
                    Err(AuthFailure::InvalidCredential)
                }
            },
        }
    }

    /// Authenticates the `Authorization` header value of one request.
    ///
    /// # Errors
    /// Returns [`AuthFailure::MissingCredential`] when `header` is `None`
    /// (the provider is not contacted), and [`AuthFailure::InvalidCredential`]
    /// when the provider rejects the token, returns no user, fails, or does
    /// not answer within the configured timeout.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<Principal, AuthFailure> {
        let Some(header) = header else {
            debug!("request has no authorization header");
            return Err(AuthFailure::MissingCredential);
        };

        let token = extract_token(header);

        let verification =
            match tokio::time::timeout(self.timeout, self.provider.verify_token(token)).await {
                Ok(Ok(verification)) => verification,
                Ok(Err(e)) => {
                    warn!(error = %e, "identity provider call failed");
                    return Err(AuthFailure::InvalidCredential);
                }
                Err(_) => {
                    warn!(
                        timeout_ms = self.timeout.as_millis() as u64,
                        "identity provider did not answer in time"
                    );
                    return Err(AuthFailure::InvalidCredential);
                }
            };

        if let Some(error) = verification.error {
            debug!(%error, "token rejected");
            return Err(AuthFailure::InvalidCredential);
        }

        match verification.user {
            Some(principal) => {
                debug!(user_id = %principal.id, "request authenticated");
                Ok(principal)
            }
            None => {
                debug!("identity provider returned no user");
                Err(AuthFailure::InvalidCredential)
            }
        }
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Extractor for the [`Principal`] attached by `require_auth`.
///
/// Only usable on routes wrapped by the authentication middleware; anywhere
/// else extraction fails with an internal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Principal);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| {
                ApiError::Internal("route is not behind the authentication filter".to_string())
            })
    }
}
