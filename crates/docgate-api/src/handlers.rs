//! Route handlers

use axum::{extract::State, Extension, Json};
use docgate_auth::Principal;
use std::sync::Arc;

use crate::models::{CurrentUser, ErrorResponse, HealthResponse};
use crate::AppState;

/// Body served at the root path
pub const HELLO_WORLD: &str = "Hello World!";

/// Root greeting
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Greeting", body = String, content_type = "text/plain")
    ),
    tag = "system"
)]
pub async fn hello_world() -> &'static str {
    HELLO_WORLD
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        auth_scheme: state.auth_scheme.to_string(),
    })
}

/// Identity of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Authenticated caller", body = CurrentUser),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn whoami(Extension(principal): Extension<Principal>) -> Json<CurrentUser> {
    Json(CurrentUser::from(principal))
}
