use super::{hash_password, validate_registration, verify_password};
use crate::{
    api::extract::AppJson,
    auth::jwt::Identity,
    db::NewUser,
    types::{AppError, LoginRequest, RegisterRequest, Result, TokenResponse},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// Exchange username and password for a token
///
/// Unknown users and wrong passwords fail identically.
pub async fn token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }

    let credentials = state.turso.get_user_credentials(&payload.username).await?;
    let stored_hash = credentials.as_ref().map(|c| c.password_hash.clone());

    if !verify_password(&state, payload.password, stored_hash).await? {
        tracing::info!(username = %payload.username, "Rejected login");
        return Err(AppError::Auth("Invalid username/password".to_string()));
    }

    let user = credentials
        .map(|c| c.user)
        .ok_or_else(|| AppError::Auth("Invalid username/password".to_string()))?;

    let token = state
        .tokens
        .issue(&Identity::new(user.username, user.is_admin))?;

    Ok(Json(TokenResponse { token }))
}

/// Register a new (non-admin) user and return a token for them
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    validate_registration(&payload)?;

    let password_hash = hash_password(&state, payload.password.clone()).await?;
    let user = state
        .turso
        .create_user(&NewUser {
            username: &payload.username,
            password_hash: &password_hash,
            first_name: &payload.first_name,
            last_name: &payload.last_name,
            email: &payload.email,
            is_admin: false,
        })
        .await?;

    tracing::info!(username = %user.username, "Registered user");

    let token = state
        .tokens
        .issue(&Identity::new(user.username, user.is_admin))?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
