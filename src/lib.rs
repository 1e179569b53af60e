//! # Trading Dashboard Backend - REST API Server
//!
//! Backend for the crypto trading dashboard. Built with
//! [Axum](https://crates.io/crates/axum) and documented through OpenAPI via
//! [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **Bearer Authentication**: Protected routes are guarded by an
//!   authentication filter that verifies the caller's token against an
//!   external identity provider (Supabase Auth) on every request.
//!
//! - **Typed Request Context**: The verified [`auth::Principal`] reaches
//!   handlers through the [`auth::AuthenticatedUser`] extractor.
//!
//! - **Database Smoke Test**: `/test-db` checks the PostgreSQL connection.
//!
//! - **OpenAPI Documentation**: Swagger UI at `/swagger-ui/`.
//!
//! - **Structured Logging**: `tracing` with `tower-http` request spans.
//!
//! ## Authentication Flow
//!
//! ```text
//! Authorization: Bearer <token>
//!        │
//!        ▼
//! require_auth ──(no header)────────────▶ 401 {"error":"No authorization header"}
//!        │
//!        ▼ strip "Bearer "
//! IdentityProvider::verify_token ──(error / fault / no user)──▶ 401 {"error":"Invalid token"}
//!        │
//!        ▼ Principal { id, email }
//! route handler
//! ```
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers, middleware and router configuration |
//! | [`auth`] | Authentication gate, principal and extractor |
//! | [`identity`] | Identity provider trait and Supabase adapter |
//! | [`config`] | TOML and environment configuration |
//! | [`db`] | PostgreSQL connection pool |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`models`] | Response DTOs with OpenAPI schemas |
//! | [`state`] | Application state management |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/health` | - | Health check |
//! | GET | `/test-db` | - | Database smoke test |
//! | GET | `/protected` | Bearer | Example protected route |
//! | GET | `/api/v1/dashboard` | Bearer | Dashboard summary |
//!
//! ## Example Usage
//!
//! ```bash
//! # Configure through the environment (or a .env file)
//! SUPABASE_URL=https://xyzcompany.supabase.co \
//! SUPABASE_ANON_KEY=... \
//! cargo run
//!
//! # Or through a TOML file
//! CONFIG_PATH=config.toml cargo run
//!
//! curl http://localhost:4000/health
//! curl -H "Authorization: Bearer $ACCESS_TOKEN" http://localhost:4000/protected
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod models;
pub mod state;
