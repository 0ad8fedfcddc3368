use crate::api::handlers::{auth, companies, jobs, users};
use crate::auth::guards::{require_admin, require_self_or_admin};
use crate::auth::middleware::authenticate;
use crate::types::AppError;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Resource routes, grouped by the guard that protects them.
pub fn create_router() -> Router<AppState> {
    let public_routes = Router::new()
        .route("/auth/token", post(auth::token))
        .route("/auth/register", post(auth::register))
        .route("/companies", get(companies::list_companies))
        .route("/companies/{handle}", get(companies::get_company))
        .route("/jobs", get(jobs::list_jobs))
        .route("/jobs/{id}", get(jobs::get_job))
        .route("/users", post(users::create_user));

    let admin_routes = Router::new()
        .route("/companies", post(companies::create_company))
        .route(
            "/companies/{handle}",
            patch(companies::update_company).delete(companies::delete_company),
        )
        .route("/jobs", post(jobs::create_job))
        .route("/jobs/{id}", patch(jobs::update_job).delete(jobs::delete_job))
        .route("/users", get(users::list_users))
        .route_layer(middleware::from_fn(require_admin));

    let self_or_admin_routes = Router::new()
        .route(
            "/users/{username}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{username}/jobs/{id}", post(users::apply_to_job))
        .route_layer(middleware::from_fn(require_self_or_admin));

    public_routes
        .merge(admin_routes)
        .merge(self_or_admin_routes)
}

/// The complete application: routes, 404 fallback, authentication gate,
/// tracing and CORS.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(create_router())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}
