//! Configuration module for loading TOML files and environment variables.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Identity provider configuration.
    pub auth: AuthConfig,
    /// Optional database configuration.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

/// Identity provider (Supabase Auth) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`.
    pub supabase_url: String,
    /// Public anon key sent as the `apikey` header.
    pub supabase_anon_key: String,
    /// Upper bound for one token verification round-trip, in milliseconds.
    #[serde(default = "default_auth_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_auth_timeout_ms() -> u64 {
    5000
}

impl AuthConfig {
    /// Returns the verification timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// PostgreSQL configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string.
    pub url: String,
    /// Maximum pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a query waits for a connection, in milliseconds.
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_ms() -> u64 {
    5000
}

impl DatabaseConfig {
    /// Returns the connection acquire timeout as a [`Duration`].
    #[must_use]
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed or validated.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    /// Recognised variables: `HOST`, `PORT`, `SUPABASE_URL`,
    /// `SUPABASE_ANON_KEY`, `AUTH_TIMEOUT_MS`, `DATABASE_URL`.
    ///
    /// # Errors
    /// Returns error if a required variable is missing or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT is not a port: {raw}")))?,
            None => defaults.port,
        };
        let timeout_ms = match lookup("AUTH_TIMEOUT_MS") {
            Some(raw) => raw.parse().map_err(|_| {
                ConfigError::InvalidValue(format!("AUTH_TIMEOUT_MS is not a number: {raw}"))
            })?,
            None => default_auth_timeout_ms(),
        };

        let config = Config {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or(defaults.host),
                port,
            },
            auth: AuthConfig {
                supabase_url: lookup("SUPABASE_URL").ok_or(ConfigError::MissingEnv("SUPABASE_URL"))?,
                supabase_anon_key: lookup("SUPABASE_ANON_KEY")
                    .ok_or(ConfigError::MissingEnv("SUPABASE_ANON_KEY"))?,
                timeout_ms,
            },
            database: lookup("DATABASE_URL").map(|url| DatabaseConfig {
                url,
                max_connections: default_max_connections(),
                acquire_timeout_ms: default_acquire_timeout_ms(),
            }),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.auth.supabase_url).map_err(|e| {
            ConfigError::InvalidValue(format!(
                "auth.supabase_url {} is not a valid URL: {}",
                self.auth.supabase_url, e
            ))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidValue(format!(
                "auth.supabase_url must use http or https, got {}",
                url.scheme()
            )));
        }
        if self.auth.supabase_anon_key.is_empty() {
            return Err(ConfigError::InvalidValue(
                "auth.supabase_anon_key cannot be empty".to_string(),
            ));
        }
        if self.auth.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "auth.timeout_ms must be positive".to_string(),
            ));
        }

        if let Some(db) = &self.database {
            if db.url.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "database.url cannot be empty".to_string(),
                ));
            }
            if db.max_connections == 0 {
                return Err(ConfigError::InvalidValue(
                    "database.max_connections must be positive".to_string(),
                ));
            }
            if db.acquire_timeout_ms == 0 {
                return Err(ConfigError::InvalidValue(
                    "database.acquire_timeout_ms must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }
}
