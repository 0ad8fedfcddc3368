use crate::{
    api::extract::{AppJson, AppPath, AppQuery},
    db::FieldMap,
    types::{AppError, JobFilter, NewJob, Result},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// List jobs, optionally filtered by `title`, `minSalary` and `hasEquity`
pub async fn list_jobs(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<JobFilter>,
) -> Result<Json<Value>> {
    let jobs = state.turso.find_jobs(&filter).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

/// Create a job (admin only)
pub async fn create_job(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewJob>,
) -> Result<(StatusCode, Json<Value>)> {
    if payload.title.trim().is_empty() || payload.company_handle.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Title and company handle are required".to_string(),
        ));
    }

    let job = state.turso.create_job(&payload).await?;
    tracing::info!(id = job.id, company = %job.company_handle, "Created job");

    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

pub async fn get_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>> {
    let job = state.turso.get_job(id).await?;
    Ok(Json(json!({ "job": job })))
}

/// Partially update a job (admin only)
pub async fn update_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(fields): AppJson<FieldMap>,
) -> Result<Json<Value>> {
    let job = state.turso.update_job(id, &fields).await?;
    Ok(Json(json!({ "job": job })))
}

pub async fn delete_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>> {
    state.turso.remove_job(id).await?;
    tracing::info!(id, "Deleted job");

    Ok(Json(json!({ "deleted": id })))
}
