//! # Jobly
//!
//! A job-board backend exposing companies, jobs and user accounts over HTTP,
//! backed by a relational store.
//!
//! ## Overview
//!
//! Jobly can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `jobly-server` binary
//! 2. **As a library** - Mount [`api::routes::create_app`] in your own binary
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use jobly::{AppState, JoblyConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = JoblyConfig::load("jobly.toml")?;
//!     let secret = config.jwt_secret()?;
//!     let state = AppState::from_config(config, &secret).await?;
//!
//!     let app = jobly::api::routes::create_app(state);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3001").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Password hashing, bearer tokens, authentication gate and guards
//! - [`db`] - Relational storage and parameterized SQL building
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration
//!
//! ## Request Pipeline
//!
//! Every request passes the authentication gate, which resolves an optional
//! bearer token into a [`auth::middleware::Principal`] without ever refusing
//! the request. Mutating routes add an admin-only or self-or-admin guard;
//! guard denials become `401` responses with a structured error body.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Authentication and authorization.
pub mod auth;
/// Relational storage.
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use auth::jwt::{Claims, Identity, TokenCodec};
pub use auth::middleware::Principal;
pub use auth::password::PasswordService;
pub use db::TursoClient;
pub use types::{AppError, Result};
pub use utils::toml_config::JoblyConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration read at startup
    pub config: Arc<JoblyConfig>,
    /// Database client
    pub turso: Arc<TursoClient>,
    /// Bearer token codec
    pub tokens: Arc<TokenCodec>,
    /// Password hashing service
    pub passwords: Arc<PasswordService>,
}

impl AppState {
    /// Builds the state from already-constructed components.
    pub fn new(config: JoblyConfig, turso: TursoClient, tokens: TokenCodec) -> Result<Self> {
        let passwords = PasswordService::new(config.auth.hash_cost)?;

        Ok(Self {
            config: Arc::new(config),
            turso: Arc::new(turso),
            tokens: Arc::new(tokens),
            passwords: Arc::new(passwords),
        })
    }

    /// Opens the configured database and builds the token codec from the
    /// given signing secret.
    pub async fn from_config(config: JoblyConfig, jwt_secret: &str) -> Result<Self> {
        let remote = config
            .turso_remote()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        let turso = match remote {
            Some((url, token)) => {
                tracing::info!("Connecting to remote Turso database");
                TursoClient::new_remote(url, token).await?
            }
            None => {
                tracing::info!(url = %config.database.url, "Opening local database");
                TursoClient::new_local(&config.database.url).await?
            }
        };

        let tokens = TokenCodec::new(jwt_secret, config.auth.token_expiry());

        Self::new(config, turso, tokens)
    }
}
