//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by resource.

/// Token and registration handlers.
pub mod auth;
/// Company handlers.
pub mod companies;
/// Job handlers.
pub mod jobs;
/// User account handlers.
pub mod users;

use crate::{
    types::{AppError, RegisterRequest, Result},
    AppState,
};

/// Hashes a password on the blocking pool.
pub(crate) async fn hash_password(state: &AppState, password: String) -> Result<String> {
    let passwords = state.passwords.clone();

    tokio::task::spawn_blocking(move || passwords.hash(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// Verifies a password on the blocking pool. Without a stored digest the
/// comparison still runs against a throwaway digest and fails.
pub(crate) async fn verify_password(
    state: &AppState,
    password: String,
    hash: Option<String>,
) -> Result<bool> {
    let passwords = state.passwords.clone();

    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => passwords.verify(&password, &hash),
        None => passwords.verify_dummy(&password),
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::InvalidInput(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<()> {
    check_length("password", password, 5, 20)
}

pub(crate) fn validate_email(email: &str) -> Result<()> {
    check_length("email", email, 6, 60)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::InvalidInput(format!("Invalid email: {}", email))),
    }
}

pub(crate) fn validate_registration(req: &RegisterRequest) -> Result<()> {
    check_length("username", &req.username, 1, 25)?;
    if req.username.chars().any(char::is_whitespace) {
        return Err(AppError::InvalidInput(
            "username must not contain whitespace".to_string(),
        ));
    }
    validate_password(&req.password)?;
    check_length("firstName", &req.first_name, 1, 30)?;
    check_length("lastName", &req.last_name, 1, 30)?;
    validate_email(&req.email)
}
