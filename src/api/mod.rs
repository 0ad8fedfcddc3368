//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Jobly, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::extract`](crate::api::extract) - Extractors with structured rejections
//!
//! # API Endpoints
//!
//! ## Authentication (`/auth`)
//! - `POST /auth/token` - Exchange username/password for a token
//! - `POST /auth/register` - Register and receive a token
//!
//! ## Companies (`/companies`)
//! - `GET /companies` - List companies (`nameLike`, `minEmployees`, `maxEmployees`)
//! - `POST /companies` - Create a company (admin)
//! - `GET /companies/{handle}` - Company with its jobs
//! - `PATCH /companies/{handle}` - Partial update (admin)
//! - `DELETE /companies/{handle}` - Delete (admin)
//!
//! ## Jobs (`/jobs`)
//! - `GET /jobs` - List jobs (`title`, `minSalary`, `hasEquity`)
//! - `POST /jobs` - Create a job (admin)
//! - `GET /jobs/{id}`, `PATCH /jobs/{id}` (admin), `DELETE /jobs/{id}` (admin)
//!
//! ## Users (`/users`)
//! - `POST /users` - Register
//! - `GET /users` - List users (admin)
//! - `GET|PATCH|DELETE /users/{username}` - Self or admin
//! - `POST /users/{username}/jobs/{id}` - Apply to a job (self or admin)
//!
//! # Authentication
//!
//! Protected endpoints require a token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! Errors are always returned as
//! `{ "error": { "message": "...", "status": 401 } }`.

/// Extractors with structured rejections.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
