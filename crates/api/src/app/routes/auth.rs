//! Registration, login, and profile endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};

use taskforge_auth::{NewUser, Principal};

use crate::app::routes::common::run_blocking;
use crate::app::{AppState, dto::LoginRequest, errors};

/// POST /auth/register - create an account and log it in.
///
/// No role id in the body means the lowest-privilege default role.
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<NewUser>,
) -> axum::response::Response {
    let auth = state.auth.clone();

    match run_blocking(move || auth.register(body)).await {
        Ok(grant) => (StatusCode::CREATED, Json(grant)).into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

/// POST /auth/login - exchange credentials for a bearer token.
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> axum::response::Response {
    let auth = state.auth.clone();

    match run_blocking(move || auth.login(&body.email, &body.password)).await {
        Ok(grant) => (StatusCode::OK, Json(grant)).into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

/// GET /auth/profile - the decoded principal for the presented token.
pub async fn profile(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(principal)
}
