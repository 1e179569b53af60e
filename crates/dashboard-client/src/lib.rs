//! HTTP client library for the Trading Dashboard API.
//!
//! This crate provides a typed HTTP client for the trading dashboard backend,
//! including its bearer-authenticated routes.
//!
//! # Example
//!
//! ```no_run
//! use dashboard_client::{ClientConfig, DashboardClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dashboard_client::Error> {
//!     let client = DashboardClient::new(ClientConfig {
//!         base_url: "http://localhost:4000".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     // Check health
//!     let health = client.health_check().await?;
//!     println!("Status: {}", health.status);
//!
//!     // Call a protected route with a Supabase access token
//!     let me = client.protected("access-token").await?;
//!     println!("Signed in as {}", me.user.email);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, DashboardClient};
pub use error::Error;
pub use types::*;
