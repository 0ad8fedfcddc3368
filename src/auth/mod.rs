//! Authentication and authorization
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id password digests
//! - [`auth::jwt`](crate::auth::jwt) - bearer token issuing and verification
//! - [`auth::middleware`](crate::auth::middleware) - the authentication gate and the `Principal` extractor
//! - [`auth::guards`](crate::auth::guards) - admin-only and self-or-admin route guards
//!
//! # Request Flow
//!
//! Every request passes through [`middleware::authenticate`], which resolves
//! the `Authorization: Bearer <token>` header into a [`middleware::Principal`]
//! and never rejects. Routes that mutate protected resources add a guard as
//! a route layer; guards are the only place a request is refused:
//!
//! ```ignore
//! use axum::{middleware, routing::post, Router};
//! use jobly::auth::guards::require_admin;
//!
//! let admin_routes = Router::new()
//!     .route("/companies", post(create_company))
//!     .route_layer(middleware::from_fn(require_admin));
//! ```
//!
//! # Configuration
//!
//! Configure via `jobly.toml`:
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"   # env var holding the signing secret
//! token_expiry_secs = 86400       # 0 issues tokens without expiry
//! hash_cost = 4                   # Argon2 time cost
//! ```

/// Route guards.
pub mod guards;
/// Bearer token codec.
pub mod jwt;
/// Authentication gate and principal extractor.
pub mod middleware;
/// Password hashing.
pub mod password;
