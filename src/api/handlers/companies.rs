use crate::{
    api::extract::{AppJson, AppPath, AppQuery},
    db::FieldMap,
    types::{AppError, CompanyFilter, NewCompany, Result},
    AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// List companies, optionally filtered by `nameLike`, `minEmployees` and
/// `maxEmployees`
pub async fn list_companies(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<CompanyFilter>,
) -> Result<Json<Value>> {
    let companies = state.turso.find_companies(&filter).await?;
    Ok(Json(json!({ "companies": companies })))
}

/// Create a company (admin only)
pub async fn create_company(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewCompany>,
) -> Result<(StatusCode, Json<Value>)> {
    if payload.handle.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Handle and name are required".to_string(),
        ));
    }

    let company = state.turso.create_company(&payload).await?;
    tracing::info!(handle = %company.handle, "Created company");

    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

/// Get a company and its jobs
pub async fn get_company(
    State(state): State<AppState>,
    AppPath(handle): AppPath<String>,
) -> Result<Json<Value>> {
    let company = state.turso.get_company(&handle).await?;
    Ok(Json(json!({ "company": company })))
}

/// Partially update a company (admin only)
pub async fn update_company(
    State(state): State<AppState>,
    AppPath(handle): AppPath<String>,
    AppJson(fields): AppJson<FieldMap>,
) -> Result<Json<Value>> {
    let company = state.turso.update_company(&handle, &fields).await?;
    Ok(Json(json!({ "company": company })))
}

/// Delete a company and its jobs (admin only)
pub async fn delete_company(
    State(state): State<AppState>,
    AppPath(handle): AppPath<String>,
) -> Result<Json<Value>> {
    state.turso.remove_company(&handle).await?;
    tracing::info!(handle = %handle, "Deleted company");

    Ok(Json(json!({ "deleted": handle })))
}
