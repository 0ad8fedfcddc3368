use super::{hash_password, validate_email, validate_password, validate_registration};
use crate::{
    api::extract::{AppJson, AppPath},
    db::{FieldMap, NewUser},
    types::{AppError, RegisterRequest, Result},
    AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// Register a new (non-admin) user
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
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

    tracing::info!(username = %user.username, "Created user");

    Ok((StatusCode::CREATED, Json(json!({ "newUser": user }))))
}

/// List all users (admin only)
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Value>> {
    let users = state.turso.find_users().await?;
    Ok(Json(json!({ "users": users })))
}

/// Get a user and the jobs they applied to (self or admin)
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> Result<Json<Value>> {
    let user = state.turso.get_user(&username).await?;
    Ok(Json(json!({ "user": user })))
}

/// Partially update a user (self or admin)
///
/// A new password is digested before the update is built.
pub async fn update_user(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    AppJson(mut fields): AppJson<FieldMap>,
) -> Result<Json<Value>> {
    if let Some(email) = fields.get("email") {
        let email = email
            .as_str()
            .ok_or_else(|| AppError::InvalidInput("email must be a string".to_string()))?;
        validate_email(email)?;
    }

    if let Some(password) = fields.get_mut("password") {
        let plain = password
            .as_str()
            .ok_or_else(|| AppError::InvalidInput("password must be a string".to_string()))?
            .to_string();
        validate_password(&plain)?;

        *password = Value::String(hash_password(&state, plain).await?);
    }

    let user = state.turso.update_user(&username, &fields).await?;
    Ok(Json(json!({ "user": user })))
}

/// Delete a user (self or admin)
pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> Result<Json<Value>> {
    state.turso.remove_user(&username).await?;
    tracing::info!(username = %username, "Deleted user");

    Ok(Json(json!({ "deleted": username })))
}

/// Apply to a job (self or admin)
pub async fn apply_to_job(
    State(state): State<AppState>,
    AppPath((username, id)): AppPath<(String, i64)>,
) -> Result<Json<Value>> {
    state.turso.apply_to_job(&username, id).await?;
    tracing::info!(username = %username, job_id = id, "Applied to job");

    Ok(Json(json!({ "applied": id })))
}
