//! Application state management.

use crate::auth::AuthGate;
use crate::config::Config;
use crate::db::DatabasePool;
use crate::identity::{IdentityProvider, ProviderError, SupabaseIdentityProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Bearer-token gate used by protected routes.
    pub auth: AuthGate,
    /// Optional database pool.
    pub db: Option<DatabasePool>,
}

impl AppState {
    /// Creates a new application state without database.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, auth_timeout: Duration) -> Self {
        Self {
            auth: AuthGate::new(provider, auth_timeout),
            db: None,
        }
    }

    /// Attaches a database pool.
    #[must_use]
    pub fn with_database(mut self, db: DatabasePool) -> Self {
        self.db = Some(db);
        self
    }

    /// Creates a new application state from configuration, using Supabase
    /// Auth as the identity provider.
    ///
    /// # Errors
    /// Returns error if the identity provider client cannot be built.
    pub fn from_config(config: &Config, db: Option<DatabasePool>) -> Result<Self, ProviderError> {
        let provider = SupabaseIdentityProvider::new(&config.auth)?;
        info!(
            endpoint = provider.user_endpoint(),
            "Using Supabase Auth for token verification"
        );

        Ok(Self {
            auth: AuthGate::new(Arc::new(provider), config.auth.timeout()),
            db,
        })
    }
}
