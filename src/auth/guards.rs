use crate::api::extract::AppPath;
use crate::auth::jwt::Claims;
use crate::auth::middleware::Principal;
use crate::types::{AppError, Result};
use axum::{extract::Request, middleware::Next, response::Response};
use std::collections::HashMap;

/// Permits only authenticated administrators.
pub fn ensure_admin(principal: &Principal) -> Result<&Claims> {
    match principal {
        Principal::Authenticated(claims) if claims.is_admin => Ok(claims),
        _ => Err(AppError::unauthorized()),
    }
}

/// Permits administrators, or the user who owns the requested resource.
pub fn ensure_self_or_admin<'a>(principal: &'a Principal, owner: &str) -> Result<&'a Claims> {
    match principal {
        Principal::Authenticated(claims) if claims.is_admin || claims.username == owner => {
            Ok(claims)
        }
        _ => Err(AppError::unauthorized()),
    }
}

/// Route layer enforcing [`ensure_admin`].
pub async fn require_admin(
    principal: Principal,
    req: Request,
    next: Next,
) -> Result<Response> {
    ensure_admin(&principal)?;
    Ok(next.run(req).await)
}

/// Route layer enforcing [`ensure_self_or_admin`] against the `username`
/// path parameter. Routes without that parameter only admit admins.
pub async fn require_self_or_admin(
    principal: Principal,
    AppPath(params): AppPath<HashMap<String, String>>,
    req: Request,
    next: Next,
) -> Result<Response> {
    match params.get("username") {
        Some(owner) => ensure_self_or_admin(&principal, owner)?,
        None => ensure_admin(&principal)?,
    };

    Ok(next.run(req).await)
}
