//! Role management endpoints.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use taskforge_auth::{Principal, UpdateRole};
use taskforge_core::RoleId;

use crate::app::routes::common::{require, run_blocking};
use crate::app::{AppState, dto::CreateRoleRequest, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", get(get_role).patch(update_role))
}

/// GET /roles
pub async fn list_roles(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    if let Err(resp) = require(&state, &principal, "roles.list") {
        return resp;
    }

    let auth = state.auth.clone();
    match run_blocking(move || auth.list_roles()).await {
        Ok(roles) => Json(serde_json::json!({ "roles": roles })).into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

/// POST /roles
pub async fn create_role(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateRoleRequest>,
) -> axum::response::Response {
    if let Err(resp) = require(&state, &principal, "roles.create") {
        return resp;
    }

    let auth = state.auth.clone();
    match run_blocking(move || auth.create_role(&body.name, body.permissions)).await {
        Ok(role) => (StatusCode::CREATED, Json(role)).into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

/// GET /roles/:id
pub async fn get_role(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    if let Err(resp) = require(&state, &principal, "roles.get") {
        return resp;
    }

    let auth = state.auth.clone();
    match run_blocking(move || auth.get_role(RoleId::from_uuid(id))).await {
        Ok(role) => Json(role).into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

/// PATCH /roles/:id
///
/// Edits take effect for tokens issued afterwards; tokens already in flight
/// keep the permission snapshot they were minted with.
pub async fn update_role(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRole>,
) -> axum::response::Response {
    if let Err(resp) = require(&state, &principal, "roles.update") {
        return resp;
    }

    let auth = state.auth.clone();
    match run_blocking(move || auth.update_role(RoleId::from_uuid(id), body)).await {
        Ok(role) => Json(role).into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}
